use std::cmp::Reverse;

use crate::builder::record;
use crate::graph::{MemberId, Participant, TargetClassDefinition};
use crate::problem::ResolutionProblem;

/// Orders the mixin overriders of every target member into its next-call
/// chain and points each overrider's `base` at the next link.
///
/// A mixin applied later wraps the ones applied before it, so the chain
/// runs from the last applied overrider inward and ends at the target
/// member. Overriders whose mixins sit in the same ordering cycle cannot be
/// ranked; the chain is still linked in fallback order and the target
/// member gets a [`ResolutionProblem::ChainCycle`].
pub(crate) fn link_next_call_chains(definition: &mut TargetClassDefinition) {
    for target_member in definition.target_members.clone() {
        let mut overriders: Vec<MemberId> = definition
            .member(target_member)
            .overridden_by
            .iter()
            .copied()
            .filter(|id| matches!(definition.member(*id).owner, Participant::Mixin(_)))
            .collect();
        if overriders.is_empty() {
            continue;
        }
        overriders.sort_by_key(|id| Reverse(position(definition, *id)));

        let mut problems = Vec::new();
        for cycle in &definition.ordering_cycles {
            let contested: Vec<String> = overriders
                .iter()
                .filter(|id| match definition.member(**id).owner {
                    Participant::Mixin(mixin) => cycle.contains(&mixin),
                    Participant::Target => false,
                })
                .map(|id| definition.member_path(*id))
                .collect();
            if contested.len() > 1 {
                problems.push(ResolutionProblem::ChainCycle {
                    member: definition.member_path(target_member),
                    overriders: contested,
                });
            }
        }
        for problem in problems {
            record(&mut definition.members[target_member.index()].problems, problem);
        }

        for (link, overrider) in overriders.iter().enumerate() {
            let base = overriders.get(link + 1).copied().unwrap_or(target_member);
            definition.members[overrider.index()].base = Some(base);
        }
        log::trace!(
            "next-call chain of `{}`: {}",
            definition.member_path(target_member),
            overriders.iter().map(|id| definition.member_path(*id)).collect::<Vec<_>>().join(" -> ")
        );
        definition.members[target_member.index()].next_call_chain = overriders;
    }
}

fn position(definition: &TargetClassDefinition, member: MemberId) -> usize {
    match definition.member(member).owner {
        Participant::Mixin(mixin) => definition.mixin(mixin).position,
        Participant::Target => usize::MAX,
    }
}
