use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;
use weave_catalog::TypeName;
use weave_context::ConfigurationError;
use weave_identity::ExportError;
use weave_validate::ValidationFailure;

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Failed to read {path}")]
    #[diagnostic(code(weave::cli::io_error))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    #[diagnostic(code(weave::cli::io_error))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest {path}: {message}")]
    #[diagnostic(
        code(weave::cli::manifest),
        help("A manifest holds a [catalog] table of [[catalog.type]] entries and a [configuration] table of [[configuration.class]] entries")
    )]
    Manifest { path: PathBuf, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationFailure),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Export(#[from] ExportError),

    #[error("`{mixin}` needs no generated type when composed onto `{target}`")]
    #[diagnostic(
        code(weave::cli::no_concrete_type),
        help("Only mixins that override members, or whose members are overridden, have exportable metadata")
    )]
    NoConcreteType { target: TypeName, mixin: TypeName },

    #[error("{failed} of {total} target(s) failed validation")]
    #[diagnostic(code(weave::cli::check_failed))]
    CheckFailed { failed: usize, total: usize },
}
