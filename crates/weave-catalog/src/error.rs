use miette::Diagnostic;
use thiserror::Error;

use crate::names::TypeName;

/// Errors raised while assembling or loading a type catalog.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The same type name was supplied twice.
    #[error("Duplicate type: `{name}` is described more than once")]
    #[diagnostic(code(weave_catalog::duplicate_type))]
    DuplicateType { name: TypeName },

    /// A base type or interface names a type the catalog does not contain.
    #[error("Unknown {role} `{reference}` referenced by `{type_name}`")]
    #[diagnostic(
        code(weave_catalog::unknown_reference),
        help("Every base type and interface must itself be described in the catalog")
    )]
    UnknownReference {
        type_name: TypeName,
        reference: TypeName,
        /// Either "base type" or "interface".
        role: &'static str,
    },

    /// The catalog source could not be parsed.
    #[error("Invalid catalog: {0}")]
    #[diagnostic(code(weave_catalog::parse_error))]
    Parse(String),
}

impl From<toml::de::Error> for CatalogError {
    fn from(err: toml::de::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}
