use std::path::Path;

use serde::Deserialize;
use weave_catalog::{InMemoryCatalog, TypeName};
use weave_context::{ClassContext, MixinConfiguration};

use crate::error::CliError;

/// A type catalog and the mixin configuration over it, in one TOML file.
///
/// ```toml
/// [[catalog.type]]
/// name = "App.Order"
///
/// [[configuration.class]]
/// target = "App.Order"
///
/// [[configuration.class.mixin]]
/// type = "App.AuditMixin"
/// ```
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub catalog: InMemoryCatalog,
    #[serde(default)]
    pub configuration: MixinConfiguration,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Manifest, CliError> {
        let source =
            std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })?;
        let manifest = Manifest::parse(&source, path)?;
        log::debug!(
            "loaded {}: {} type(s), {} configured target(s)",
            path.display(),
            manifest.catalog.len(),
            manifest.configuration.configured_targets().count()
        );
        Ok(manifest)
    }

    pub fn parse(source: &str, path: &Path) -> Result<Manifest, CliError> {
        toml::from_str(source).map_err(|err| CliError::Manifest { path: path.to_path_buf(), message: err.to_string() })
    }

    /// `target` if given, otherwise every configured target.
    pub fn targets(&self, target: Option<&TypeName>) -> Vec<TypeName> {
        match target {
            Some(target) => vec![target.clone()],
            None => self.configuration.configured_targets().cloned().collect(),
        }
    }

    pub fn context_for(&self, target: &TypeName) -> Result<ClassContext, CliError> {
        Ok(self.configuration.context_for(target, &self.catalog)?)
    }
}
