use weave_catalog::{InMemoryCatalog, MemberInfo, TypeInfo, TypeName};
use weave_context::{ClassContext, MixinContext};
use weave_definitions::{DefinitionBuilder, MemberId, Participant, TargetClassDefinition};

pub const TARGET: &str = "App.Target";

/// A mixin whose face is the target class and that needs no next-call type.
pub fn mixin(name: &str) -> TypeInfo {
    TypeInfo::mixin(name, [TARGET], Vec::<&str>::new())
}

/// `App.Target` with a virtual `Foo()`, plus mixins `App.M1` and `App.M2`
/// that both override it.
pub fn overriding_pair() -> Vec<TypeInfo> {
    vec![
        TypeInfo::class(TARGET).with_member(MemberInfo::method("Foo").as_virtual()),
        mixin("App.M1").with_member(MemberInfo::method("Foo").overriding_target()),
        mixin("App.M2").with_member(MemberInfo::method("Foo").overriding_target()),
    ]
}

pub fn catalog(types: Vec<TypeInfo>) -> InMemoryCatalog {
    InMemoryCatalog::from_types(types).unwrap()
}

pub fn context(catalog: &InMemoryCatalog, mixins: Vec<MixinContext>) -> ClassContext {
    mixins
        .into_iter()
        .fold(ClassContext::builder(TARGET), |builder, mixin| builder.mixin(mixin))
        .build(catalog)
        .unwrap()
}

pub fn build(catalog: &InMemoryCatalog, context: &ClassContext) -> TargetClassDefinition {
    let _ = env_logger::builder().is_test(true).try_init();
    DefinitionBuilder::new(catalog).build(context)
}

pub fn target_member(definition: &TargetClassDefinition, name: &str) -> MemberId {
    definition.find_member(Participant::Target, name).unwrap().id
}

/// The full call chain of a target member, rendered outermost first.
pub fn chain(definition: &TargetClassDefinition, name: &str) -> Vec<String> {
    definition
        .call_chain(target_member(definition, name))
        .into_iter()
        .map(|id| definition.member_path(id))
        .collect()
}

pub fn order(definition: &TargetClassDefinition) -> Vec<&str> {
    definition.mixins_in_order().map(|mixin| mixin.mixin_type.as_str()).collect()
}

pub fn problems(definition: &TargetClassDefinition) -> Vec<String> {
    definition.all_problems().iter().map(|problem| problem.to_string()).collect()
}

pub fn name(value: &str) -> TypeName {
    TypeName::from(value)
}
