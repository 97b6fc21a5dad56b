use std::collections::{BTreeMap, BTreeSet};

use weave_catalog::{MemberInfo, MemberRef, Signature, TypeInfo, TypeName};
use weave_definitions::{MixinId, Participant, TargetClassDefinition};

use crate::identifier::ConcreteMixinTypeIdentifier;

/// Name of the public wrapper generated for a non-public member.
pub fn wrapper_name(signature: &Signature) -> String {
    format!("__wrap_{}", signature.mangled())
}

/// Name of the generated interface through which a mixin calls the target
/// members that override it.
pub fn override_interface_name(mixin_type: &TypeName) -> TypeName {
    TypeName::new(format!("{mixin_type}.IOverriddenMethods"))
}

/// Everything a code emitter needs to generate one concrete mixin type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcreteMixinTypeMetadata {
    pub identifier: ConcreteMixinTypeIdentifier,
    /// Present when the target overrides members of the mixin.
    pub override_interface: Option<TypeName>,
    /// Non-public mixin members taking part in an override chain, mapped to
    /// the public wrapper the generated types call them through. Overriders
    /// are called from the target's chain; overridden members expose their
    /// base implementation.
    pub wrappers: BTreeMap<MemberRef, String>,
    /// Mixin members overridden by the target, mapped to the matching
    /// method of the override interface.
    pub override_methods: BTreeMap<MemberRef, MemberRef>,
}

impl ConcreteMixinTypeMetadata {
    pub fn from_definition(definition: &TargetClassDefinition, mixin: MixinId) -> Option<Self> {
        let identifier = ConcreteMixinTypeIdentifier::from_definition(definition, mixin)?;
        let interface = override_interface_name(&identifier.mixin_type);

        let mut wrappers = BTreeMap::new();
        let mut override_methods = BTreeMap::new();
        for member in definition.members_of(Participant::Mixin(mixin)) {
            let overridden = member.is_overridden();
            if !overridden && !member.is_override() {
                continue;
            }
            let member_ref = member.member_ref();
            if !member.visibility.is_public() {
                wrappers.insert(member_ref.clone(), wrapper_name(&member.signature));
            }
            if overridden {
                override_methods.insert(member_ref, MemberRef::new(interface.clone(), member.signature.clone()));
            }
        }

        Some(ConcreteMixinTypeMetadata {
            identifier,
            override_interface: (!override_methods.is_empty()).then_some(interface),
            wrappers,
            override_methods,
        })
    }

    pub fn mixin_type(&self) -> &TypeName {
        &self.identifier.mixin_type
    }

    /// The override interface as a catalog type, for emitters that register
    /// what they generate.
    pub fn override_interface_info(&self) -> Option<TypeInfo> {
        let name = self.override_interface.as_ref()?;
        let info = self
            .override_methods
            .values()
            .fold(TypeInfo::interface(name.clone()), |info, method| {
                info.with_member(MemberInfo::new(method.signature.clone()))
            });
        Some(info)
    }
}

/// What the generated subclass of the target class looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcreteTargetMetadata {
    pub target: TypeName,
    /// Mixins in application order.
    pub mixins: Vec<TypeName>,
    /// Identifiers of the mixins that need generated types.
    pub mixin_identifiers: Vec<ConcreteMixinTypeIdentifier>,
    /// Non-public target members overridden by mixins, mapped to the public
    /// wrapper the mixins call as their next-call target.
    pub wrappers: BTreeMap<MemberRef, String>,
    /// Introduced and composed interfaces the generated type implements.
    pub interfaces: BTreeSet<TypeName>,
}

impl ConcreteTargetMetadata {
    pub fn from_definition(definition: &TargetClassDefinition) -> Self {
        let wrappers = definition
            .members_of(Participant::Target)
            .filter(|member| !member.visibility.is_public() && !member.next_call_chain.is_empty())
            .map(|member| (member.member_ref(), wrapper_name(&member.signature)))
            .collect();
        let interfaces = definition
            .introduced_interfaces
            .iter()
            .map(|introduced| introduced.interface.clone())
            .chain(definition.composed_interfaces.iter().map(|composed| composed.interface.clone()))
            .collect();

        ConcreteTargetMetadata {
            target: definition.target.clone(),
            mixins: definition.mixins_in_order().map(|mixin| mixin.mixin_type.clone()).collect(),
            mixin_identifiers: ConcreteMixinTypeIdentifier::all_from_definition(definition),
            wrappers,
            interfaces,
        }
    }
}
