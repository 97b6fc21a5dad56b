use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hasher;

use fxhash::FxHasher64;
use serde::{Deserialize, Serialize};
use weave_catalog::{MemberRef, TypeName};
use weave_definitions::{MixinId, Participant, TargetClassDefinition};

/// The structural identity of a generated mixin subclass.
///
/// Two compositions that apply the same mixin with the same members
/// overriding it and the same members overridden by it share one
/// generated type, whatever else they compose. Member sets are ordered
/// sets, so equality and hashing ignore the order members were found in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConcreteMixinTypeIdentifier {
    pub mixin_type: TypeName,
    /// Members of other participants that override members of the mixin.
    pub overriders: BTreeSet<MemberRef>,
    /// Members the mixin overrides.
    pub overridden: BTreeSet<MemberRef>,
}

impl ConcreteMixinTypeIdentifier {
    pub fn new<A, B>(mixin_type: impl Into<TypeName>, overriders: A, overridden: B) -> Self
    where
        A: IntoIterator<Item = MemberRef>,
        B: IntoIterator<Item = MemberRef>,
    {
        ConcreteMixinTypeIdentifier {
            mixin_type: mixin_type.into(),
            overriders: overriders.into_iter().collect(),
            overridden: overridden.into_iter().collect(),
        }
    }

    /// The identifier of `mixin` in `definition`, or `None` when the mixin
    /// neither overrides nor is overridden and needs no generated type.
    pub fn from_definition(definition: &TargetClassDefinition, mixin: MixinId) -> Option<Self> {
        if !definition.requires_concrete_type(mixin) {
            return None;
        }
        let members = definition.members_of(Participant::Mixin(mixin));
        let mut overriders = BTreeSet::new();
        let mut overridden = BTreeSet::new();
        for member in members {
            overriders.extend(member.overridden_by.iter().map(|id| definition.member(*id).member_ref()));
            overridden.extend(member.overrides.iter().map(|id| definition.member(*id).member_ref()));
        }
        Some(ConcreteMixinTypeIdentifier {
            mixin_type: definition.mixin(mixin).mixin_type.clone(),
            overriders,
            overridden,
        })
    }

    /// Identifiers of every mixin of `definition` that needs a generated
    /// type, in application order.
    pub fn all_from_definition(definition: &TargetClassDefinition) -> Vec<Self> {
        definition
            .mixin_order
            .iter()
            .filter_map(|mixin| Self::from_definition(definition, *mixin))
            .collect()
    }

    /// A hash for naming generated types. It depends only on the
    /// identifier's contents, fed to a 64-bit FxHash one byte or one `u64`
    /// at a time, so it is the same in every process and on every target.
    pub fn stable_hash(&self) -> u64 {
        let mut hasher = FxHasher64::default();
        write_str(&mut hasher, self.mixin_type.as_str());
        for set in [&self.overriders, &self.overridden] {
            hasher.write_u64(set.len() as u64);
            for member in set {
                write_member(&mut hasher, member);
            }
        }
        hasher.finish()
    }

    /// Every member reference the identifier mentions.
    pub fn members(&self) -> impl Iterator<Item = &MemberRef> + '_ {
        self.overriders.iter().chain(self.overridden.iter())
    }
}

fn write_str(hasher: &mut FxHasher64, text: &str) {
    hasher.write_u64(text.len() as u64);
    for byte in text.bytes() {
        hasher.write_u8(byte);
    }
}

fn write_member(hasher: &mut FxHasher64, member: &MemberRef) {
    let signature = &member.signature;
    write_str(hasher, member.declaring_type.as_str());
    write_str(hasher, &signature.name);
    hasher.write_u8(signature.kind as u8);
    hasher.write_u64(signature.parameters.len() as u64);
    for parameter in &signature.parameters {
        write_str(hasher, parameter.as_str());
    }
    match &signature.return_type {
        Some(return_type) => {
            hasher.write_u8(1);
            write_str(hasher, return_type.as_str());
        }
        None => hasher.write_u8(0),
    }
}

impl fmt::Display for ConcreteMixinTypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render = |set: &BTreeSet<MemberRef>| set.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        write!(
            f,
            "{} [overridden by: {}] [overrides: {}]",
            self.mixin_type,
            render(&self.overriders),
            render(&self.overridden)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_catalog::Signature;

    fn member(ty: &str, name: &str) -> MemberRef {
        MemberRef::new(ty, Signature::method(name))
    }

    #[test]
    fn equality_ignores_member_order_and_duplicates() {
        let a = ConcreteMixinTypeIdentifier::new(
            "App.M",
            [],
            [member("App.T", "Foo"), member("App.T", "Bar")],
        );
        let b = ConcreteMixinTypeIdentifier::new(
            "App.M",
            [],
            [member("App.T", "Bar"), member("App.T", "Foo"), member("App.T", "Bar")],
        );
        assert_eq!(a, b);
        assert_eq!(a.stable_hash(), b.stable_hash());
    }

    #[test]
    fn differing_sets_differ() {
        let foo = ConcreteMixinTypeIdentifier::new("App.M", [], [member("App.T", "Foo")]);
        let bar = ConcreteMixinTypeIdentifier::new("App.M", [], [member("App.T", "Bar")]);
        let reversed = ConcreteMixinTypeIdentifier::new("App.M", [member("App.T", "Foo")], []);
        assert_ne!(foo, bar);
        assert_ne!(foo, reversed);
        assert_ne!(foo.stable_hash(), bar.stable_hash());
        assert_ne!(foo.stable_hash(), reversed.stable_hash());
    }

    #[test]
    fn stable_hash_is_pinned() {
        let id = ConcreteMixinTypeIdentifier::new("App.M", [], [member("App.T", "Foo")]);
        assert_eq!(format!("{:016x}", id.stable_hash()), "faf9e1f298b44b6e");
    }

    #[test]
    fn displays_both_sets() {
        let id = ConcreteMixinTypeIdentifier::new("App.M", [member("App.T", "Audit")], [member("App.T", "Foo")]);
        assert_eq!(id.to_string(), "App.M [overridden by: App.T.Audit()] [overrides: App.T.Foo()]");
    }
}
