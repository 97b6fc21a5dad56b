use fxhash::FxHashMap;
use serde::Deserialize;

use crate::catalog::TypeCatalog;
use crate::error::CatalogError;
use crate::info::TypeInfo;
use crate::names::{MemberRef, TypeName};

/// A pre-loaded, in-memory [`TypeCatalog`].
///
/// Loadable from TOML:
///
/// ```toml
/// [[type]]
/// name = "App.Order"
/// interfaces = ["App.IOrder"]
///
/// [[type.member]]
/// name = "Save"
/// virtual = true
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "CatalogSource")]
pub struct InMemoryCatalog {
    types: FxHashMap<TypeName, TypeInfo>,
}

#[derive(Debug, Deserialize)]
struct CatalogSource {
    #[serde(default, rename = "type")]
    types: Vec<TypeInfo>,
}

impl TryFrom<CatalogSource> for InMemoryCatalog {
    type Error = CatalogError;

    fn try_from(source: CatalogSource) -> Result<Self, Self::Error> {
        InMemoryCatalog::from_types(source.types)
    }
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog and checks that every base type and interface it
    /// mentions is itself present.
    pub fn from_types<I>(types: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = TypeInfo>,
    {
        let mut catalog = InMemoryCatalog::new();
        for info in types {
            catalog.insert(info)?;
        }
        catalog.check_references()?;
        Ok(catalog)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let source: CatalogSource = toml::from_str(source)?;
        InMemoryCatalog::try_from(source)
    }

    pub fn insert(&mut self, info: TypeInfo) -> Result<(), CatalogError> {
        if self.types.contains_key(&info.name) {
            return Err(CatalogError::DuplicateType { name: info.name });
        }
        log::trace!("catalog: registered `{}` ({} members)", info.name, info.members.len());
        self.types.insert(info.name.clone(), info);
        Ok(())
    }

    /// Inserts or replaces a type, e.g. a type produced by a code emitter.
    pub fn upsert(&mut self, info: TypeInfo) {
        self.types.insert(info.name.clone(), info);
    }

    pub fn remove_type(&mut self, name: &TypeName) -> Option<TypeInfo> {
        self.types.remove(name)
    }

    /// Drops a single member from its declaring type. Returns whether the
    /// member existed.
    pub fn remove_member(&mut self, member: &MemberRef) -> bool {
        let Some(info) = self.types.get_mut(&member.declaring_type) else {
            return false;
        };
        let before = info.members.len();
        info.members.retain(|m| m.signature != member.signature);
        before != info.members.len()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All type names, sorted.
    pub fn type_names(&self) -> Vec<&TypeName> {
        let mut names: Vec<_> = self.types.keys().collect();
        names.sort();
        names
    }

    fn check_references(&self) -> Result<(), CatalogError> {
        for name in self.type_names() {
            let info = &self.types[name];
            if let Some(base) = &info.base {
                if !self.types.contains_key(base) {
                    return Err(CatalogError::UnknownReference {
                        type_name: name.clone(),
                        reference: base.clone(),
                        role: "base type",
                    });
                }
            }
            for interface in &info.interfaces {
                if !self.types.contains_key(interface) {
                    return Err(CatalogError::UnknownReference {
                        type_name: name.clone(),
                        reference: interface.clone(),
                        role: "interface",
                    });
                }
            }
        }
        Ok(())
    }
}

impl TypeCatalog for InMemoryCatalog {
    fn lookup(&self, name: &TypeName) -> Option<&TypeInfo> {
        self.types.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemberInfo, OverrideMarker, Signature, TypeKind, Visibility};
    use expect_test::expect;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::from_types([
            TypeInfo::interface("App.IEntity"),
            TypeInfo::interface("App.IOrder").with_interface("App.IEntity"),
            TypeInfo::class("App.EntityBase")
                .with_interface("App.IEntity")
                .with_member(MemberInfo::method("Save").as_virtual())
                .with_member(MemberInfo::method("Validate").as_abstract()),
            TypeInfo::class("App.Order")
                .with_base("App.EntityBase")
                .with_interface("App.IOrder")
                .with_member(MemberInfo::method("Save").as_virtual())
                .with_member(MemberInfo::property("Total").returning("System.Decimal")),
        ])
        .unwrap()
    }

    #[test]
    fn derived_members_hide_base_members() {
        let catalog = catalog();
        let members: Vec<String> = catalog
            .members(&"App.Order".into())
            .iter()
            .map(|m| m.member_ref().to_string())
            .collect();
        expect![[r#"
            [
                "App.Order.Save()",
                "App.Order.Total",
                "App.EntityBase.Validate()",
            ]
        "#]]
        .assert_debug_eq(&members);
    }

    #[test]
    fn interfaces_are_transitive() {
        let catalog = catalog();
        let order = TypeName::from("App.Order");
        let interfaces: Vec<_> = catalog.interfaces(&order).into_iter().collect();
        assert_eq!(interfaces, vec![TypeName::from("App.IEntity"), TypeName::from("App.IOrder")]);
        assert!(catalog.is_assignable(&order, &"App.EntityBase".into()));
        assert!(catalog.is_assignable(&order, &"App.IEntity".into()));
        assert!(!catalog.is_assignable(&"App.EntityBase".into(), &order));
        assert!(catalog.is_aggregate_capable(&"App.IOrder".into()));
        assert!(!catalog.is_aggregate_capable(&"App.IEntity".into()));
    }

    #[test]
    fn rejects_duplicates_and_dangling_references() {
        let dup = InMemoryCatalog::from_types([TypeInfo::class("A"), TypeInfo::class("A")]);
        assert_eq!(dup.unwrap_err(), CatalogError::DuplicateType { name: "A".into() });

        let dangling = InMemoryCatalog::from_types([TypeInfo::class("A").with_base("Missing")]);
        assert!(matches!(dangling, Err(CatalogError::UnknownReference { role: "base type", .. })));
    }

    #[test]
    fn remove_member_affects_lookup() {
        let mut catalog = catalog();
        let save = MemberRef::new("App.Order", Signature::method("Save"));
        assert!(catalog.find_member(&save).is_some());
        assert!(catalog.remove_member(&save));
        assert!(catalog.find_member(&save).is_none());
        assert!(!catalog.remove_member(&save));
    }

    #[test]
    fn loads_from_toml() {
        let catalog = InMemoryCatalog::from_toml_str(
            r#"
            [[type]]
            name = "App.IAudit"
            kind = "interface"

            [[type]]
            name = "App.AuditMixin"
            interfaces = ["App.IAudit"]
            constructor = "protected"
            mixin_base = { face = ["App.Order"], next_call = [] }

            [[type.member]]
            name = "Save"
            visibility = "protected"
            override = { kind = "target" }

            [[type.member]]
            name = "Log"
            parameters = ["System.String"]
            abstract = true
            "#,
        )
        .unwrap();

        let mixin = catalog.lookup(&"App.AuditMixin".into()).unwrap();
        assert_eq!(mixin.kind, TypeKind::Class);
        assert_eq!(mixin.constructor_visibility, Visibility::Protected);
        assert_eq!(mixin.mixin_base.as_ref().unwrap().face, vec![TypeName::from("App.Order")]);
        assert_eq!(mixin.members[0].override_marker, Some(OverrideMarker::Target));
        assert_eq!(mixin.members[0].visibility, Visibility::Protected);
        assert!(mixin.members[1].is_abstract);
        assert_eq!(mixin.members[1].signature.parameters, vec![TypeName::from("System.String")]);
        assert_eq!(catalog.kind_of(&"App.IAudit".into()), Some(TypeKind::Interface));
    }
}
