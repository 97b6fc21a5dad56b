use std::sync::Arc;

use parking_lot::Mutex;
use weave_catalog::TypeName;
use weave_identity::{
    CodeEmitter, ComposeError, Composer, Composition, ConcreteMixinTypeMetadata, ConcreteTypeCache, EmitError,
};

use crate::common::*;

/// Emits type names and remembers what it was asked to emit.
#[derive(Default)]
struct RecordingEmitter {
    emitted: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl CodeEmitter for RecordingEmitter {
    type Handle = String;

    fn emit_mixin_type(&self, metadata: &ConcreteMixinTypeMetadata) -> Result<String, EmitError> {
        let name = format!("{}${:016x}", metadata.mixin_type(), metadata.identifier.stable_hash());
        if self.fail_on == Some(metadata.mixin_type().as_str()) {
            return Err(EmitError { type_name: metadata.mixin_type().clone(), message: "refused".to_string() });
        }
        self.emitted.lock().push(name.clone());
        Ok(name)
    }

    fn emit_target_type(&self, composition: &Composition, mixin_types: &[Arc<String>]) -> Result<String, EmitError> {
        let name = format!("{}$Mixed[{}]", composition.target.target, mixin_types.len());
        self.emitted.lock().push(name.clone());
        Ok(name)
    }
}

#[test]
fn generates_each_concrete_mixin_type_once() {
    let catalog = catalog();
    let composer = Composer::new(&catalog, Arc::new(ConcreteTypeCache::new()));
    let emitter = RecordingEmitter::default();

    let first = composer
        .compose_and_generate(&context(&catalog, "App.Order", &["App.LogMixin", "App.AuditMixin"]), &emitter)
        .unwrap();
    let second = composer
        .compose_and_generate(&context(&catalog, "App.Invoice", &["App.LogMixin"]), &emitter)
        .unwrap();

    assert_eq!(first.target_type, "App.Order$Mixed[2]");
    assert_eq!(second.target_type, "App.Invoice$Mixed[1]");
    assert!(Arc::ptr_eq(&first.mixin_types[0], &second.mixin_types[0]));

    let emitted = emitter.emitted.lock();
    assert_eq!(emitted.len(), 4);
    assert_eq!(emitted.iter().filter(|name| name.starts_with("App.LogMixin$")).count(), 1);
    assert_eq!(composer.cache().len(), 2);
}

#[test]
fn target_metadata_lists_wrappers_and_interfaces() {
    let catalog = catalog();
    let composer: Composer<'_, String> = Composer::new(&catalog, Arc::new(ConcreteTypeCache::new()));
    let composition = composer
        .compose(&context(&catalog, "App.Order", &["App.LogMixin", "App.AuditMixin"]))
        .unwrap();

    assert_eq!(composition.target.mixins, vec![TypeName::from("App.LogMixin"), TypeName::from("App.AuditMixin")]);
    assert_eq!(composition.target.mixin_identifiers.len(), 2);
    assert!(composition.target.wrappers.is_empty());
    assert!(composition.mixin_metadata(&"App.TraceMixin".into()).is_none());
    assert!(composition.report.is_valid());
}

#[test]
fn invalid_configuration_never_reaches_the_emitter() {
    let catalog = weave_catalog::InMemoryCatalog::from_types([
        weave_catalog::TypeInfo::class("App.Abstract")
            .with_member(weave_catalog::MemberInfo::method("Foo").as_abstract()),
    ])
    .unwrap();
    let composer = Composer::new(&catalog, Arc::new(ConcreteTypeCache::new()));
    let emitter = RecordingEmitter::default();

    let err = composer
        .compose_and_generate(&context(&catalog, "App.Abstract", &[]), &emitter)
        .unwrap_err();
    assert!(matches!(err, ComposeError::Validation(ref failure) if failure.error_count == 1));
    assert!(emitter.emitted.lock().is_empty());
    assert!(composer.cache().is_empty());
}

#[test]
fn emitter_failure_is_propagated_and_not_cached() {
    let catalog = catalog();
    let composer = Composer::new(&catalog, Arc::new(ConcreteTypeCache::new()));
    let failing = RecordingEmitter { fail_on: Some("App.AuditMixin"), ..RecordingEmitter::default() };
    let ctx = context(&catalog, "App.Order", &["App.LogMixin", "App.AuditMixin"]);

    let err = composer.compose_and_generate(&ctx, &failing).unwrap_err();
    assert_eq!(err.to_string(), "Code emission failed for `App.AuditMixin`: refused");
    assert_eq!(composer.cache().len(), 1);
    assert_eq!(composer.cache().stats().failures, 1);

    let working = RecordingEmitter::default();
    let generated = composer.compose_and_generate(&ctx, &working).unwrap();
    assert_eq!(generated.mixin_types.len(), 2);
    assert_eq!(composer.cache().len(), 2);
}
