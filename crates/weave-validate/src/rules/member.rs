use weave_definitions::{MemberDefinition, Participant, TargetClassDefinition};

use crate::rule::{Rule, RuleSet};

pub fn member_rules() -> RuleSet {
    RuleSet::new("member")
        .with_rule(Rule::member("member.resolution", |_, member, log| {
            for problem in &member.problems {
                log.error(problem.to_string());
            }
        }))
        .with_rule(Rule::member("member.overridable", |definition, member, log| {
            if !member.is_overridden() || member.is_overridable() {
                return;
            }
            let reason = if member.is_final { "final" } else { "not virtual" };
            log.error(format!("overridden by {} but {}", overriders(definition, member), reason));
        }))
        .with_rule(Rule::member("member.override-visibility", |_, member, log| {
            if member.is_override() && !member.visibility.is_subclass_accessible() {
                log.error(format!(
                    "an overriding member must be at least protected to be reachable, found {}",
                    member.visibility
                ));
            }
        }))
        .with_rule(Rule::member("member.override-cycle", |definition, member, log| {
            if let Some(cycle) = override_cycle(definition, member) {
                log.error(format!("override cycle: {}", cycle.join(" -> ")));
            }
        }))
        .with_rule(Rule::member("member.abstract-target", |_, member, log| {
            if member.owner == Participant::Target && member.is_abstract && !member.is_overridden() {
                log.error("abstract target member not overridden by any mixin");
            }
        }))
        .with_rule(Rule::member("member.abstract-mixin", |_, member, log| {
            if matches!(member.owner, Participant::Mixin(_)) && member.is_abstract && !member.is_overridden() {
                log.error("abstract mixin member not overridden by the target class");
            }
        }))
        .with_rule(Rule::member("member.mixin-base", |definition, member, log| {
            let Participant::Mixin(mixin) = member.owner else {
                return;
            };
            if member.is_overridden() && !definition.mixin(mixin).has_mixin_base {
                log.error("members of a mixin without the generic mixin base cannot be overridden");
            }
        }))
}

fn overriders(definition: &TargetClassDefinition, member: &MemberDefinition) -> String {
    member
        .overridden_by
        .iter()
        .map(|id| format!("`{}`", definition.member_path(*id)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Follows `base` links from `member`; returns the path if it leads back.
fn override_cycle(definition: &TargetClassDefinition, member: &MemberDefinition) -> Option<Vec<String>> {
    let mut path = vec![definition.member_path(member.id)];
    let mut current = member.base;
    for _ in 0..definition.members.len() {
        let next = current?;
        path.push(definition.member_path(next));
        if next == member.id {
            return Some(path);
        }
        current = definition.member(next).base;
    }
    None
}
