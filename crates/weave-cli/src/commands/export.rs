use std::path::Path;

use weave_catalog::TypeName;

use crate::commands::compose;
use crate::error::CliError;
use crate::manifest::Manifest;

pub fn export_metadata(manifest: &Manifest, target: &TypeName, mixin: &TypeName) -> Result<String, CliError> {
    let composition = compose(manifest, target)?;
    let metadata = composition
        .mixin_metadata(mixin)
        .ok_or_else(|| CliError::NoConcreteType { target: target.clone(), mixin: mixin.clone() })?;
    Ok(weave_identity::export(metadata)?)
}

pub fn handle_export(
    manifest_path: &Path,
    target: &TypeName,
    mixin: &TypeName,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let manifest = Manifest::load(manifest_path)?;
    let blob = export_metadata(&manifest, target, mixin)?;
    match output {
        Some(path) => {
            std::fs::write(path, blob).map_err(|source| CliError::Write { path: path.to_path_buf(), source })?;
            log::info!("wrote metadata for `{mixin}` to {}", path.display());
        }
        None => println!("{blob}"),
    }
    Ok(())
}
