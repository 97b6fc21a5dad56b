use weave_catalog::{InMemoryCatalog, MemberInfo, TypeInfo, Visibility};
use weave_context::{ClassContext, MixinContext};

/// Two target classes sharing `App.Base.Foo()`, a mixin overriding it and a
/// mixin with a protected `Audit()` that `App.Order` overrides.
pub fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::from_types([
        TypeInfo::class("App.Base").with_member(MemberInfo::method("Foo").as_virtual()),
        TypeInfo::class("App.Order")
            .with_base("App.Base")
            .with_member(MemberInfo::method("Audit").overriding_mixin(Some("App.AuditMixin"))),
        TypeInfo::class("App.Invoice").with_base("App.Base"),
        TypeInfo::mixin("App.LogMixin", ["App.Base"], Vec::<&str>::new())
            .with_member(MemberInfo::method("Foo").overriding_target()),
        TypeInfo::mixin("App.AuditMixin", ["App.Base"], Vec::<&str>::new()).with_member(
            MemberInfo::method("Audit").as_virtual().with_visibility(Visibility::Protected),
        ),
        TypeInfo::mixin("App.TraceMixin", ["App.Base"], Vec::<&str>::new()),
    ])
    .unwrap()
}

pub fn context(catalog: &InMemoryCatalog, target: &str, mixins: &[&str]) -> ClassContext {
    mixins
        .iter()
        .fold(ClassContext::builder(target), |builder, mixin| builder.mixin(MixinContext::new(*mixin)))
        .build(catalog)
        .unwrap()
}
