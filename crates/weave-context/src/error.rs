use miette::Diagnostic;
use thiserror::Error;
use weave_catalog::TypeName;

/// Malformed or contradictory class/mixin configuration.
///
/// Raised eagerly by context building and merging; a failure affects only
/// the context being built.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Cannot remove mixin `{mixin}` from `{target}`: it is not inherited from the base context")]
    #[diagnostic(
        code(weave_context::removal_of_absent_mixin),
        help("Only mixins configured on a base type can be removed by a derived type")
    )]
    RemovalOfAbsentMixin { target: TypeName, mixin: TypeName },

    #[error("`{target}` cannot expose composed interface `{interface}`: {reason}")]
    #[diagnostic(code(weave_context::composed_interface))]
    ComposedInterfaceNotImplementable {
        target: TypeName,
        interface: TypeName,
        reason: String,
    },

    #[error("Unknown {role} type `{name}`")]
    #[diagnostic(
        code(weave_context::unknown_type),
        help("The type must be described in the type catalog")
    )]
    UnknownType { name: TypeName, role: &'static str },

    #[error("`{derived}` does not derive from `{base}`; its context cannot be merged onto the base context")]
    #[diagnostic(code(weave_context::not_derived))]
    NotDerived { base: TypeName, derived: TypeName },

    #[error("Duplicate configuration for class `{target}`")]
    #[diagnostic(code(weave_context::duplicate_class))]
    DuplicateClass { target: TypeName },

    #[error("Invalid mixin configuration: {0}")]
    #[diagnostic(code(weave_context::parse_error))]
    Parse(String),
}

impl From<toml::de::Error> for ConfigurationError {
    fn from(err: toml::de::Error) -> Self {
        ConfigurationError::Parse(err.to_string())
    }
}
