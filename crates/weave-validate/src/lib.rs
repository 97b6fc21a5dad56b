//! Validation of mixin composition definition graphs.
//!
//! A [`Validator`] holds rule sets; each [`Rule`] is a closure tagged with
//! the [`NodeKind`] it inspects. Validation walks a
//! [`TargetClassDefinition`](weave_definitions::TargetClassDefinition) once,
//! runs every applicable rule on every node, and returns the complete
//! [`ValidationReport`]. A report with errors converts into a
//! [`ValidationFailure`], the gate in front of identity computation and
//! code generation.

mod findings;
mod report;
mod rule;
pub mod rules;
mod validator;

pub use findings::{Severity, ValidationFinding, ValidationLog};
pub use report::{ValidationFailure, ValidationReport};
pub use rule::{
    DependencyCheck, MemberCheck, MixinCheck, NodeKind, RequiredTypeCheck, Rule, RuleCheck, RuleSet,
    TargetClassCheck,
};
pub use validator::Validator;
