use std::collections::BTreeMap;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use weave_catalog::{MemberRef, TypeCatalog, TypeName};

use crate::identifier::ConcreteMixinTypeIdentifier;
use crate::metadata::ConcreteMixinTypeMetadata;

/// Version written into every exported record.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error, Diagnostic)]
#[error("Failed to export metadata for `{mixin}`")]
#[diagnostic(code(weave_identity::export_failed))]
pub struct ExportError {
    pub mixin: TypeName,
    #[source]
    pub source: serde_json::Error,
}

/// Errors raised when re-associating an exported record with the current
/// type catalog.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Malformed metadata: {0}")]
    #[diagnostic(code(weave_identity::malformed))]
    Malformed(String),

    #[error("Unsupported metadata version {found} (supported: {supported})")]
    #[diagnostic(code(weave_identity::unsupported_version))]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Unknown type: mixin `{mixin}` is not in the type catalog")]
    #[diagnostic(code(weave_identity::unknown_mixin))]
    UnknownMixin { mixin: TypeName },

    /// The catalog no longer has a member the record refers to.
    #[error("Member not found: `{member}` no longer exists")]
    #[diagnostic(
        code(weave_identity::member_not_found),
        help("The type changed since the metadata was exported; regenerate the concrete type")
    )]
    MemberNotFound { member: MemberRef },

    #[error("Missing override interface: `{interface}` of mixin `{mixin}` is not in the type catalog")]
    #[diagnostic(code(weave_identity::missing_override_interface))]
    MissingOverrideInterface { mixin: TypeName, interface: TypeName },

    #[error("Missing interface method: `{method}` is not declared by the override interface")]
    #[diagnostic(code(weave_identity::missing_interface_method))]
    MissingInterfaceMethod { method: MemberRef },
}

#[derive(Debug, Serialize, Deserialize)]
struct MetadataRecord {
    version: u32,
    identifier: ConcreteMixinTypeIdentifier,
    #[serde(default)]
    override_interface: Option<TypeName>,
    #[serde(default)]
    wrappers: Vec<WrapperEntry>,
    #[serde(default)]
    override_methods: Vec<OverrideMethodEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WrapperEntry {
    member: MemberRef,
    wrapper: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct OverrideMethodEntry {
    member: MemberRef,
    interface_method: MemberRef,
}

/// Serializes the metadata of one concrete mixin type.
///
/// Members are stored by declaring type and signature, never by anything
/// tied to a single process.
pub fn export(metadata: &ConcreteMixinTypeMetadata) -> Result<String, ExportError> {
    let record = MetadataRecord {
        version: FORMAT_VERSION,
        identifier: metadata.identifier.clone(),
        override_interface: metadata.override_interface.clone(),
        wrappers: metadata
            .wrappers
            .iter()
            .map(|(member, wrapper)| WrapperEntry { member: member.clone(), wrapper: wrapper.clone() })
            .collect(),
        override_methods: metadata
            .override_methods
            .iter()
            .map(|(member, method)| OverrideMethodEntry { member: member.clone(), interface_method: method.clone() })
            .collect(),
    };
    serde_json::to_string_pretty(&record)
        .map_err(|source| ExportError { mixin: metadata.identifier.mixin_type.clone(), source })
}

/// Reads back a record written by [`export`], checking every member it
/// mentions against `catalog`.
pub fn import(blob: &str, catalog: &dyn TypeCatalog) -> Result<ConcreteMixinTypeMetadata, ImportError> {
    let record: MetadataRecord = serde_json::from_str(blob).map_err(|err| ImportError::Malformed(err.to_string()))?;
    if record.version != FORMAT_VERSION {
        return Err(ImportError::UnsupportedVersion { found: record.version, supported: FORMAT_VERSION });
    }

    let mixin = &record.identifier.mixin_type;
    if !catalog.contains(mixin) {
        return Err(ImportError::UnknownMixin { mixin: mixin.clone() });
    }

    let referenced = record
        .identifier
        .members()
        .chain(record.wrappers.iter().map(|entry| &entry.member))
        .chain(record.override_methods.iter().map(|entry| &entry.member));
    for member in referenced {
        if catalog.find_member(member).is_none() {
            return Err(ImportError::MemberNotFound { member: member.clone() });
        }
    }

    if let Some(interface) = &record.override_interface {
        if !catalog.contains(interface) {
            return Err(ImportError::MissingOverrideInterface { mixin: mixin.clone(), interface: interface.clone() });
        }
        for entry in &record.override_methods {
            if catalog.find_member(&entry.interface_method).is_none() {
                return Err(ImportError::MissingInterfaceMethod { method: entry.interface_method.clone() });
            }
        }
    }

    log::debug!("imported metadata for {}", record.identifier);
    Ok(ConcreteMixinTypeMetadata {
        identifier: record.identifier,
        override_interface: record.override_interface,
        wrappers: record.wrappers.into_iter().map(|entry| (entry.member, entry.wrapper)).collect::<BTreeMap<_, _>>(),
        override_methods: record
            .override_methods
            .into_iter()
            .map(|entry| (entry.member, entry.interface_method))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_catalog::InMemoryCatalog;

    #[test]
    fn rejects_garbage_and_future_versions() {
        let catalog = InMemoryCatalog::new();
        assert!(matches!(import("not json", &catalog), Err(ImportError::Malformed(_))));

        let future = r#"{ "version": 2, "identifier": { "mixin_type": "App.M", "overriders": [], "overridden": [] } }"#;
        assert_eq!(
            import(future, &catalog).unwrap_err(),
            ImportError::UnsupportedVersion { found: 2, supported: FORMAT_VERSION }
        );
    }

    #[test]
    fn unknown_mixin_is_reported() {
        let blob = r#"{ "version": 1, "identifier": { "mixin_type": "App.M", "overriders": [], "overridden": [] } }"#;
        assert_eq!(
            import(blob, &InMemoryCatalog::new()).unwrap_err(),
            ImportError::UnknownMixin { mixin: "App.M".into() }
        );
    }
}
