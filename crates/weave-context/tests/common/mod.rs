use weave_catalog::{InMemoryCatalog, TypeInfo};

pub fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::from_types([
        TypeInfo::interface("App.IAudit"),
        TypeInfo::interface("App.IPrice"),
        TypeInfo::class("App.EntityBase"),
        TypeInfo::class("App.Order").with_base("App.EntityBase"),
        TypeInfo::class("App.SpecialOrder").with_base("App.Order"),
        TypeInfo::class("App.Widget"),
        TypeInfo::mixin("App.AuditMixin", ["App.EntityBase"], Vec::<&str>::new()).with_interface("App.IAudit"),
        TypeInfo::mixin("App.CacheMixin", Vec::<&str>::new(), Vec::<&str>::new()),
        TypeInfo::mixin("App.TraceMixin", Vec::<&str>::new(), Vec::<&str>::new()),
    ])
    .unwrap()
}
