//! The context model of the Weave composition engine.
//!
//! A [`ClassContext`] is the immutable request "compose these mixins onto
//! this target": it is built from raw configuration
//! ([`MixinConfiguration`], [`ClassContextBuilder`]), merged along the
//! target's inheritance chain ([`merge`]), and frozen before it is handed
//! to the definition builder.

mod class;
mod configuration;
mod error;
mod merge;
mod mixin;

pub use class::{ClassContext, ClassContextBuilder};
pub use configuration::MixinConfiguration;
pub use error::ConfigurationError;
pub use merge::{merge, ContextAmendments};
pub use mixin::{IntroducedVisibility, MixinContext};
