use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;

use weave_catalog::TypeName;
use weave_identity::{Composer, Composition, ConcreteTypeCache};

use crate::error::CliError;
use crate::manifest::Manifest;

/// Builds, validates and identifies the composition of `target`.
pub fn compose(manifest: &Manifest, target: &TypeName) -> Result<Composition, CliError> {
    let context = manifest.context_for(target)?;
    let composer: Composer<'_, ()> = Composer::new(&manifest.catalog, Arc::new(ConcreteTypeCache::new()));
    Ok(composer.compose(&context)?)
}

pub fn render_composition(composition: &Composition) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}:", composition.target.target);
    if composition.mixin_types.is_empty() {
        let _ = writeln!(out, "  no concrete mixin types");
    }
    for identifier in composition.identifiers() {
        let _ = writeln!(out, "  {identifier} #{:016x}", identifier.stable_hash());
    }
    out
}

pub fn handle_identify(manifest_path: &Path, target: Option<&TypeName>) -> Result<(), CliError> {
    let manifest = Manifest::load(manifest_path)?;
    for target in manifest.targets(target) {
        let composition = compose(&manifest, &target)?;
        print!("{}", render_composition(&composition));
    }
    Ok(())
}
