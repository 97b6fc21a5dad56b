use std::collections::BTreeSet;

use fxhash::FxHashSet;

use crate::info::{MemberInfo, TypeInfo, TypeKind};
use crate::names::{MemberRef, TypeName};

/// A member as seen on a type, together with the type that declares it.
#[derive(Debug, Clone, Copy)]
pub struct CatalogMember<'a> {
    pub declaring_type: &'a TypeName,
    pub info: &'a MemberInfo,
}

impl CatalogMember<'_> {
    pub fn member_ref(&self) -> MemberRef {
        MemberRef::new(self.declaring_type.clone(), self.info.signature.clone())
    }
}

/// The query surface the composition engine consumes.
///
/// Implementations must answer deterministically over a closed set of
/// types for the duration of a resolution run. Only [`lookup`](Self::lookup)
/// is required; every other query is derived from it.
pub trait TypeCatalog: Send + Sync {
    fn lookup(&self, name: &TypeName) -> Option<&TypeInfo>;

    fn contains(&self, name: &TypeName) -> bool {
        self.lookup(name).is_some()
    }

    fn kind_of(&self, name: &TypeName) -> Option<TypeKind> {
        self.lookup(name).map(|info| info.kind)
    }

    /// Members declared directly on `name`, in catalog order.
    fn declared_members(&self, name: &TypeName) -> &[MemberInfo] {
        self.lookup(name).map(|info| info.members.as_slice()).unwrap_or(&[])
    }

    /// `name` followed by its base types, most derived first.
    ///
    /// Stops at the first base that is not in the catalog, and at a
    /// repeated type should the catalog contain an inheritance loop.
    fn base_chain(&self, name: &TypeName) -> Vec<TypeName> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        let mut current = self.lookup(name);
        while let Some(info) = current {
            if !seen.insert(info.name.clone()) {
                break;
            }
            chain.push(info.name.clone());
            current = info.base.as_ref().and_then(|base| self.lookup(base));
        }
        chain
    }

    /// Declared and inherited members of `name`.
    ///
    /// A member declared on a more derived type hides base members with a
    /// matching signature.
    fn members(&self, name: &TypeName) -> Vec<CatalogMember<'_>> {
        let mut result: Vec<CatalogMember<'_>> = Vec::new();
        for ty in self.base_chain(name) {
            let Some(info) = self.lookup(&ty) else { continue };
            for member in &info.members {
                let hidden = result
                    .iter()
                    .any(|seen| seen.declaring_type != &info.name && seen.info.signature.matches(&member.signature));
                if !hidden {
                    result.push(CatalogMember { declaring_type: &info.name, info: member });
                }
            }
        }
        result
    }

    /// Every interface `name` implements, through its bases and through
    /// interface inheritance. An interface does not list itself.
    fn interfaces(&self, name: &TypeName) -> BTreeSet<TypeName> {
        let mut result = BTreeSet::new();
        let mut pending: Vec<TypeName> = Vec::new();
        for ty in self.base_chain(name) {
            if let Some(info) = self.lookup(&ty) {
                pending.extend(info.interfaces.iter().cloned());
            }
        }
        while let Some(interface) = pending.pop() {
            if !result.insert(interface.clone()) {
                continue;
            }
            if let Some(info) = self.lookup(&interface) {
                pending.extend(info.interfaces.iter().cloned());
            }
        }
        result
    }

    /// `from` is `to`, derives from it, or implements it.
    fn is_assignable(&self, from: &TypeName, to: &TypeName) -> bool {
        from == to || self.base_chain(from).iter().any(|t| t == to) || self.interfaces(from).contains(to)
    }

    /// An interface that adds no members of its own and only bundles other
    /// interfaces may be satisfied jointly by several implementers.
    fn is_aggregate_capable(&self, name: &TypeName) -> bool {
        match self.lookup(name) {
            Some(info) => info.is_interface() && info.members.is_empty() && !info.interfaces.is_empty(),
            None => false,
        }
    }

    /// Resolves a persistent member reference against the current catalog.
    fn find_member(&self, member: &MemberRef) -> Option<&MemberInfo> {
        self.lookup(&member.declaring_type)?.declared_member(&member.signature)
    }
}
