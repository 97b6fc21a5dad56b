use weave_catalog::{InMemoryCatalog, MemberInfo, TypeInfo};
use weave_context::{ClassContext, MixinContext};
use weave_definitions::{DefinitionBuilder, TargetClassDefinition};
use weave_validate::{ValidationReport, Validator};

pub const TARGET: &str = "App.Target";

pub fn mixin(name: &str) -> TypeInfo {
    TypeInfo::mixin(name, [TARGET], Vec::<&str>::new())
}

pub fn overriding_pair() -> Vec<TypeInfo> {
    vec![
        TypeInfo::class(TARGET).with_member(MemberInfo::method("Foo").as_virtual()),
        mixin("App.M1").with_member(MemberInfo::method("Foo").overriding_target()),
        mixin("App.M2").with_member(MemberInfo::method("Foo").overriding_target()),
    ]
}

pub fn definition(types: Vec<TypeInfo>, mixins: Vec<MixinContext>) -> TargetClassDefinition {
    let catalog = InMemoryCatalog::from_types(types).unwrap();
    let context = mixins
        .into_iter()
        .fold(ClassContext::builder(TARGET), |builder, mixin| builder.mixin(mixin))
        .build(&catalog)
        .unwrap();
    DefinitionBuilder::new(&catalog).build(&context)
}

pub fn validate(types: Vec<TypeInfo>, mixins: Vec<MixinContext>) -> ValidationReport {
    Validator::new().validate(&definition(types, mixins))
}

/// `rule: message` for every error in the report.
pub fn errors(report: &ValidationReport) -> Vec<String> {
    report.errors().map(|finding| format!("{}: {}", finding.rule, finding)).collect()
}
