//! Structural identity and generation plumbing for validated compositions.
//!
//! A mixin that overrides something, or is overridden, needs a generated
//! subclass. [`ConcreteMixinTypeIdentifier`] captures what makes two such
//! subclasses interchangeable, [`ConcreteTypeCache`] makes sure each one is
//! generated at most once per process, and [`export`]/[`import`] carry the
//! generation metadata across processes. [`Composer`] ties the pipeline
//! together in front of a [`CodeEmitter`].

mod blob;
mod cache;
mod composer;
mod identifier;
mod metadata;

pub use blob::{export, import, ExportError, ImportError, FORMAT_VERSION};
pub use cache::{CacheStats, ConcreteTypeCache};
pub use composer::{CodeEmitter, ComposeError, Composer, Composition, EmitError, GeneratedComposition};
pub use identifier::ConcreteMixinTypeIdentifier;
pub use metadata::{override_interface_name, wrapper_name, ConcreteMixinTypeMetadata, ConcreteTargetMetadata};
