use std::collections::BTreeSet;
use std::fmt;

use weave_catalog::{AttributeInfo, MemberRef, OverrideMarker, Signature, TypeKind, TypeName, Visibility};
use weave_context::{ClassContext, IntroducedVisibility, MixinContext};

use crate::problem::ResolutionProblem;

/// Index of a member in [`TargetClassDefinition::members`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub u32);

/// Index of a mixin in [`TargetClassDefinition::mixins`]; equal to its
/// declaration index in the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MixinId(pub u32);

/// Index of a dependency in [`TargetClassDefinition::dependencies`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyId(pub u32);

impl MemberId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl MixinId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl DependencyId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The target class itself or one of its mixins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Participant {
    Target,
    Mixin(MixinId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DependencyKind {
    /// The mixin's `This` view of the composed object.
    Face,
    /// The mixin's `Base` view: the next implementation down the chain.
    NextCall,
    /// Declared in the mixin's context through `depends_on`.
    Explicit,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyKind::Face => write!(f, "face"),
            DependencyKind::NextCall => write!(f, "next-call"),
            DependencyKind::Explicit => write!(f, "explicit"),
        }
    }
}

/// A member of the target or of a mixin, with its override links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDefinition {
    pub id: MemberId,
    pub owner: Participant,
    /// The type that declares the member; a base type of the owner for
    /// inherited members.
    pub declaring_type: TypeName,
    pub signature: Signature,
    pub visibility: Visibility,
    pub is_abstract: bool,
    pub is_virtual: bool,
    pub is_final: bool,
    pub override_marker: Option<OverrideMarker>,
    /// Members this member overrides.
    pub overrides: Vec<MemberId>,
    /// Members overriding this one.
    pub overridden_by: Vec<MemberId>,
    /// The member a call to the base implementation reaches.
    pub base: Option<MemberId>,
    /// For a target member: the mixin overriders, outermost first. The
    /// target member itself terminates the chain and is not listed.
    pub next_call_chain: Vec<MemberId>,
    pub problems: Vec<ResolutionProblem>,
}

impl MemberDefinition {
    pub fn member_ref(&self) -> MemberRef {
        MemberRef::new(self.declaring_type.clone(), self.signature.clone())
    }

    pub fn is_overridable(&self) -> bool {
        (self.is_virtual || self.is_abstract) && !self.is_final
    }

    pub fn is_overridden(&self) -> bool {
        !self.overridden_by.is_empty()
    }

    pub fn is_override(&self) -> bool {
        !self.overrides.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixinDefinition {
    pub id: MixinId,
    pub mixin_type: TypeName,
    pub context: MixinContext,
    /// `None` when the catalog does not describe the mixin type.
    pub kind: Option<TypeKind>,
    pub is_sealed: bool,
    pub constructor_visibility: Visibility,
    pub has_mixin_base: bool,
    pub face_types: Vec<TypeName>,
    pub next_call_types: Vec<TypeName>,
    pub interfaces: BTreeSet<TypeName>,
    pub attributes: Vec<AttributeInfo>,
    pub members: Vec<MemberId>,
    pub dependencies: Vec<DependencyId>,
    /// Position in the resolved application order.
    pub position: usize,
    pub problems: Vec<ResolutionProblem>,
}

/// A requirement of one mixin on the composed object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDefinition {
    pub id: DependencyId,
    pub kind: DependencyKind,
    pub requirer: MixinId,
    pub required_type: TypeName,
    /// Who satisfies the requirement. Empty when unresolved.
    pub implementers: Vec<Participant>,
    pub is_aggregate: bool,
    /// Base interfaces resolved one by one when the required type itself
    /// had no implementer.
    pub aggregated: Vec<TypeName>,
    pub problems: Vec<ResolutionProblem>,
}

impl DependencyDefinition {
    pub fn is_resolved(&self) -> bool {
        !self.implementers.is_empty()
    }
}

/// A type required by one or more dependencies of the same kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredTypeDefinition {
    pub kind: DependencyKind,
    pub required_type: TypeName,
    pub type_kind: Option<TypeKind>,
    pub target_is_assignable: bool,
    pub is_aggregate_capable: bool,
    pub requirers: Vec<MixinId>,
    pub dependencies: Vec<DependencyId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntroducedInterface {
    pub interface: TypeName,
    pub implementer: MixinId,
    pub visibility: IntroducedVisibility,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntroducedAttribute {
    pub attribute_type: TypeName,
    pub source: MixinId,
    pub allow_multiple: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedInterfaceDefinition {
    pub interface: TypeName,
    /// Target first if it implements the interface, then mixins in
    /// application order.
    pub implementers: Vec<Participant>,
}

/// The resolved composition graph of one target class.
///
/// All nodes live in arenas owned by the definition and refer to each
/// other by id. Problems found while resolving are recorded on the node
/// they concern; the graph is always complete enough to be validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetClassDefinition {
    pub target: TypeName,
    pub context: ClassContext,
    pub target_kind: Option<TypeKind>,
    pub is_sealed: bool,
    pub target_interfaces: BTreeSet<TypeName>,
    pub attributes: Vec<AttributeInfo>,
    pub members: Vec<MemberDefinition>,
    /// Members of the target, declared and inherited.
    pub target_members: Vec<MemberId>,
    /// Mixins in declaration order.
    pub mixins: Vec<MixinDefinition>,
    /// Mixins in application order: earlier entries end up nearer the target.
    pub mixin_order: Vec<MixinId>,
    pub dependencies: Vec<DependencyDefinition>,
    pub required_types: Vec<RequiredTypeDefinition>,
    pub composed_interfaces: Vec<ComposedInterfaceDefinition>,
    pub introduced_interfaces: Vec<IntroducedInterface>,
    pub introduced_attributes: Vec<IntroducedAttribute>,
    /// Groups of mixins whose relative order could not be determined.
    pub ordering_cycles: Vec<Vec<MixinId>>,
    pub problems: Vec<ResolutionProblem>,
}

impl TargetClassDefinition {
    pub fn member(&self, id: MemberId) -> &MemberDefinition {
        &self.members[id.index()]
    }

    pub fn mixin(&self, id: MixinId) -> &MixinDefinition {
        &self.mixins[id.index()]
    }

    pub fn dependency(&self, id: DependencyId) -> &DependencyDefinition {
        &self.dependencies[id.index()]
    }

    pub fn mixin_by_type(&self, mixin_type: &TypeName) -> Option<&MixinDefinition> {
        self.mixins.iter().find(|mixin| &mixin.mixin_type == mixin_type)
    }

    pub fn mixins_in_order(&self) -> impl Iterator<Item = &MixinDefinition> + '_ {
        self.mixin_order.iter().map(|id| self.mixin(*id))
    }

    pub fn participant_type(&self, participant: Participant) -> &TypeName {
        match participant {
            Participant::Target => &self.target,
            Participant::Mixin(id) => &self.mixin(id).mixin_type,
        }
    }

    /// Members of one participant.
    pub fn members_of(&self, participant: Participant) -> impl Iterator<Item = &MemberDefinition> + '_ {
        let ids: &[MemberId] = match participant {
            Participant::Target => &self.target_members,
            Participant::Mixin(id) => &self.mixin(id).members,
        };
        ids.iter().map(|id| self.member(*id))
    }

    /// First member of `participant` with the given name.
    pub fn find_member(&self, participant: Participant, name: &str) -> Option<&MemberDefinition> {
        self.members_of(participant).find(|member| member.signature.name == name)
    }

    /// `Owner.Signature`, naming a member by the participant that carries it.
    pub fn member_path(&self, id: MemberId) -> String {
        let member = self.member(id);
        format!("{}.{}", self.participant_type(member.owner), member.signature)
    }

    /// The full call chain of a target member: its mixin overriders,
    /// outermost first, then the member itself.
    pub fn call_chain(&self, target_member: MemberId) -> Vec<MemberId> {
        let mut chain = self.member(target_member).next_call_chain.clone();
        chain.push(target_member);
        chain
    }

    /// Whether the mixin needs a generated subclass: it overrides something
    /// or something overrides it.
    pub fn requires_concrete_type(&self, mixin: MixinId) -> bool {
        self.mixin(mixin)
            .members
            .iter()
            .map(|id| self.member(*id))
            .any(|member| member.is_override() || member.is_overridden())
    }

    /// Every problem recorded anywhere in the graph.
    pub fn all_problems(&self) -> Vec<&ResolutionProblem> {
        let mut problems: Vec<&ResolutionProblem> = self.problems.iter().collect();
        problems.extend(self.mixins.iter().flat_map(|mixin| mixin.problems.iter()));
        problems.extend(self.members.iter().flat_map(|member| member.problems.iter()));
        problems.extend(self.dependencies.iter().flat_map(|dependency| dependency.problems.iter()));
        problems
    }

    pub fn has_problems(&self) -> bool {
        !self.all_problems().is_empty()
    }
}
