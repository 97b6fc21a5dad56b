use miette::Diagnostic;
use thiserror::Error;
use weave_catalog::TypeName;

use crate::graph::DependencyKind;

/// A non-fatal problem found while building a definition graph.
///
/// Problems are recorded on the node they concern and collected; building
/// never stops at the first one. The validator turns them into findings.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq, Hash)]
pub enum ResolutionProblem {
    #[error("Unknown type: `{name}` is not described in the type catalog")]
    #[diagnostic(code(weave_definitions::unknown_type))]
    UnknownType { name: TypeName },

    /// A member marked as an override has no matching member to override.
    #[error("Override target not found: `{member}` overrides nothing on {expected}")]
    #[diagnostic(
        code(weave_definitions::override_target_not_found),
        help("Overrides are matched by name, member kind and parameter types")
    )]
    OverrideTargetNotFound { member: String, expected: String },

    #[error("Ambiguous override: `{member}` matches {}", join(.candidates))]
    #[diagnostic(code(weave_definitions::ambiguous_override))]
    AmbiguousOverride { member: String, candidates: Vec<String> },

    /// Ordering constraints between mixins contradict each other.
    #[error("Cyclic mixin ordering: {} order each other", join(.mixins))]
    #[diagnostic(
        code(weave_definitions::ordering_cycle),
        help("Check the `precedes`, `follows` and `depends_on` declarations of these mixins")
    )]
    OrderingCycle { mixins: Vec<TypeName> },

    /// Several mixins override the same member and their relative order is
    /// part of an ordering cycle.
    #[error("Cyclic next-call chain for `{member}`: {} cannot be ordered", join(.overriders))]
    #[diagnostic(code(weave_definitions::chain_cycle))]
    ChainCycle { member: String, overriders: Vec<String> },

    #[error("Unresolved dependency: {kind} dependency of `{requirer}` on `{required_type}` has no implementer")]
    #[diagnostic(
        code(weave_definitions::unresolved_dependency),
        help("Implement `{required_type}` on the target class or add a mixin that does")
    )]
    UnresolvedDependency {
        kind: DependencyKind,
        requirer: TypeName,
        required_type: TypeName,
    },

    #[error("Duplicate introduction: interface `{interface}` is introduced by {}", join(.mixins))]
    #[diagnostic(code(weave_definitions::duplicate_introduction))]
    DuplicateIntroduction { interface: TypeName, mixins: Vec<TypeName> },

    #[error("Duplicate attribute: `{attribute}` does not allow multiple uses but is introduced by {}", join(.mixins))]
    #[diagnostic(code(weave_definitions::duplicate_attribute))]
    DuplicateAttribute { attribute: TypeName, mixins: Vec<TypeName> },
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items.iter().map(|item| format!("`{item}`")).collect::<Vec<_>>().join(", ")
}
