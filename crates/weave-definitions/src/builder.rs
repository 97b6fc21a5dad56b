use weave_catalog::{CatalogMember, OverrideMarker, TypeCatalog, TypeName, Visibility};
use weave_context::ClassContext;

use crate::graph::{MemberDefinition, MemberId, MixinDefinition, MixinId, Participant, TargetClassDefinition};
use crate::problem::ResolutionProblem;
use crate::{chains, dependencies, introductions, ordering};

/// Turns a [`ClassContext`] into a [`TargetClassDefinition`].
///
/// Building is a pure function of the context and the catalog. It does not
/// fail: anything that cannot be resolved is recorded as a
/// [`ResolutionProblem`] on the affected node.
pub struct DefinitionBuilder<'c> {
    catalog: &'c dyn TypeCatalog,
}

impl<'c> DefinitionBuilder<'c> {
    pub fn new(catalog: &'c dyn TypeCatalog) -> Self {
        DefinitionBuilder { catalog }
    }

    pub fn build(&self, context: &ClassContext) -> TargetClassDefinition {
        log::debug!("building definition for `{}` with {} mixin(s)", context.target(), context.mixin_count());
        let mut definition = self.collect(context);
        link_overrides(&mut definition);
        let ordering = ordering::order_mixins(&definition, self.catalog);
        ordering::apply(&mut definition, ordering);
        chains::link_next_call_chains(&mut definition);
        dependencies::resolve(&mut definition, self.catalog);
        introductions::collect(&mut definition, self.catalog);
        log::debug!(
            "definition for `{}`: {} member(s), {} dependency(ies), {} problem(s)",
            definition.target,
            definition.members.len(),
            definition.dependencies.len(),
            definition.all_problems().len()
        );
        definition
    }

    fn collect(&self, context: &ClassContext) -> TargetClassDefinition {
        let target = context.target().clone();
        let target_info = self.catalog.lookup(&target);
        let mut definition = TargetClassDefinition {
            target: target.clone(),
            context: context.clone(),
            target_kind: target_info.map(|info| info.kind),
            is_sealed: target_info.map_or(false, |info| info.is_sealed),
            target_interfaces: self.catalog.interfaces(&target),
            attributes: target_info.map(|info| info.attributes.clone()).unwrap_or_default(),
            members: Vec::new(),
            target_members: Vec::new(),
            mixins: Vec::new(),
            mixin_order: Vec::new(),
            dependencies: Vec::new(),
            required_types: Vec::new(),
            composed_interfaces: Vec::new(),
            introduced_interfaces: Vec::new(),
            introduced_attributes: Vec::new(),
            ordering_cycles: Vec::new(),
            problems: Vec::new(),
        };
        if target_info.is_none() {
            record(&mut definition.problems, ResolutionProblem::UnknownType { name: target.clone() });
        }

        for member in self.catalog.members(&target) {
            let id = push_member(&mut definition, Participant::Target, member);
            definition.target_members.push(id);
        }

        for (index, mixin_context) in context.mixins().enumerate() {
            let id = MixinId(index as u32);
            let info = self.catalog.lookup(&mixin_context.mixin_type);
            let mixin_base = info.and_then(|info| info.mixin_base.as_ref());
            let mut mixin = MixinDefinition {
                id,
                mixin_type: mixin_context.mixin_type.clone(),
                context: mixin_context.clone(),
                kind: info.map(|info| info.kind),
                is_sealed: info.map_or(false, |info| info.is_sealed),
                constructor_visibility: info.map_or(Visibility::Public, |info| info.constructor_visibility),
                has_mixin_base: mixin_base.is_some(),
                face_types: mixin_base.map(|base| base.face.clone()).unwrap_or_default(),
                next_call_types: mixin_base.map(|base| base.next_call.clone()).unwrap_or_default(),
                interfaces: self.catalog.interfaces(&mixin_context.mixin_type),
                attributes: info.map(|info| info.attributes.clone()).unwrap_or_default(),
                members: Vec::new(),
                dependencies: Vec::new(),
                position: index,
                problems: Vec::new(),
            };
            if info.is_none() {
                record(&mut mixin.problems, ResolutionProblem::UnknownType { name: mixin.mixin_type.clone() });
            }
            definition.mixins.push(mixin);

            for member in self.catalog.members(&mixin_context.mixin_type) {
                let member_id = push_member(&mut definition, Participant::Mixin(id), member);
                definition.mixins[index].members.push(member_id);
            }
        }
        definition
    }
}

fn push_member(definition: &mut TargetClassDefinition, owner: Participant, member: CatalogMember<'_>) -> MemberId {
    let id = MemberId(definition.members.len() as u32);
    definition.members.push(MemberDefinition {
        id,
        owner,
        declaring_type: member.declaring_type.clone(),
        signature: member.info.signature.clone(),
        visibility: member.info.visibility,
        is_abstract: member.info.is_abstract,
        is_virtual: member.info.is_virtual,
        is_final: member.info.is_final,
        override_marker: member.info.override_marker.clone(),
        overrides: Vec::new(),
        overridden_by: Vec::new(),
        base: None,
        next_call_chain: Vec::new(),
        problems: Vec::new(),
    });
    id
}

pub(crate) fn record(problems: &mut Vec<ResolutionProblem>, problem: ResolutionProblem) {
    log::warn!("{problem}");
    problems.push(problem);
}

/// Connects members marked as overrides with the members they override.
///
/// Mixin members marked `Target` are matched against the target's members,
/// target members marked `Mixin` against the members of the named mixin
/// (or of every mixin).
fn link_overrides(definition: &mut TargetClassDefinition) {
    for mixin_index in 0..definition.mixins.len() {
        let member_ids = definition.mixins[mixin_index].members.clone();
        for member_id in member_ids {
            let member = definition.member(member_id);
            if member.override_marker != Some(OverrideMarker::Target) {
                continue;
            }
            if definition.mixins[mixin_index].context.is_suppressed(&member.signature.name) {
                log::debug!("`{}` suppressed by its mixin context", definition.member_path(member_id));
                continue;
            }
            let candidates: Vec<MemberId> = definition
                .target_members
                .iter()
                .copied()
                .filter(|candidate| definition.member(*candidate).signature.matches(&member.signature))
                .collect();
            let expected = format!("target `{}`", definition.target);
            connect(definition, member_id, candidates, expected);
        }
    }

    for member_id in definition.target_members.clone() {
        let Some(OverrideMarker::Mixin { mixin }) = definition.member(member_id).override_marker.clone() else {
            continue;
        };
        let signature = &definition.member(member_id).signature;
        let candidates: Vec<MemberId> = definition
            .mixins
            .iter()
            .filter(|candidate| mixin.as_ref().map_or(true, |name| &candidate.mixin_type == name))
            .flat_map(|candidate| candidate.members.iter().copied())
            .filter(|candidate| definition.member(*candidate).signature.matches(signature))
            .collect();
        let expected = match &mixin {
            Some(name) => format!("mixin `{name}`"),
            None => "any mixin".to_string(),
        };
        connect(definition, member_id, candidates, expected);
    }
}

fn connect(definition: &mut TargetClassDefinition, overrider: MemberId, candidates: Vec<MemberId>, expected: String) {
    match candidates.as_slice() {
        [] => {
            let problem = ResolutionProblem::OverrideTargetNotFound { member: definition.member_path(overrider), expected };
            record(&mut definition.members[overrider.index()].problems, problem);
        }
        [overridden] => {
            let overridden = *overridden;
            log::trace!("`{}` overrides `{}`", definition.member_path(overrider), definition.member_path(overridden));
            let member = &mut definition.members[overrider.index()];
            member.overrides.push(overridden);
            member.base = Some(overridden);
            definition.members[overridden.index()].overridden_by.push(overrider);
        }
        _ => {
            let problem = ResolutionProblem::AmbiguousOverride {
                member: definition.member_path(overrider),
                candidates: candidates.iter().map(|id| definition.member_path(*id)).collect(),
            };
            record(&mut definition.members[overrider.index()].problems, problem);
        }
    }
}

/// Whether `participant` is assignable to `ty`.
pub(crate) fn participant_is_assignable(
    definition: &TargetClassDefinition,
    catalog: &dyn TypeCatalog,
    participant: Participant,
    ty: &TypeName,
) -> bool {
    catalog.is_assignable(definition.participant_type(participant), ty)
}
