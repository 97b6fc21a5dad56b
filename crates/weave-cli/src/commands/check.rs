use std::path::Path;

use weave_catalog::TypeName;
use weave_definitions::DefinitionBuilder;
use weave_validate::{ValidationReport, Validator};

use crate::error::CliError;
use crate::manifest::Manifest;

/// Builds and validates every requested target. A target whose context
/// cannot be assembled aborts the run; validation problems do not.
pub fn check(manifest: &Manifest, target: Option<&TypeName>) -> Result<Vec<ValidationReport>, CliError> {
    let validator = Validator::new();
    let builder = DefinitionBuilder::new(&manifest.catalog);
    manifest
        .targets(target)
        .iter()
        .map(|target| {
            let context = manifest.context_for(target)?;
            Ok(validator.validate(&builder.build(&context)))
        })
        .collect()
}

pub fn handle_check(manifest_path: &Path, target: Option<&TypeName>) -> Result<(), CliError> {
    let manifest = Manifest::load(manifest_path)?;
    let reports = check(&manifest, target)?;
    for report in &reports {
        print!("{report}");
    }

    let failed = reports.iter().filter(|report| !report.is_valid()).count();
    if failed > 0 {
        return Err(CliError::CheckFailed { failed, total: reports.len() });
    }
    println!("✅ {} target(s) valid", reports.len());
    Ok(())
}
