use weave_catalog::TypeKind;
use weave_definitions::Participant;

use crate::rule::{Rule, RuleSet};

pub fn target_class_rules() -> RuleSet {
    RuleSet::new("target-class")
        .with_rule(Rule::target_class("target.resolution", |definition, log| {
            for problem in &definition.problems {
                log.error(problem.to_string());
            }
        }))
        .with_rule(Rule::target_class("target.is-class", |definition, log| {
            if definition.target_kind == Some(TypeKind::Interface) {
                log.error("an interface cannot be the target of a mixin composition");
            }
        }))
        .with_rule(Rule::target_class("target.not-sealed", |definition, log| {
            if !definition.is_sealed {
                return;
            }
            let overridden = definition.members_of(Participant::Target).any(|member| {
                member
                    .overridden_by
                    .iter()
                    .any(|id| matches!(definition.member(*id).owner, Participant::Mixin(_)))
            });
            if overridden {
                log.error("a sealed class cannot have its members overridden by mixins");
            }
        }))
        .with_rule(Rule::target_class("target.composed-interfaces", |definition, log| {
            for composed in &definition.composed_interfaces {
                if composed.implementers.is_empty() {
                    log.error(format!(
                        "composed interface `{}` is implemented neither by the target nor by a mixin",
                        composed.interface
                    ));
                }
            }
        }))
}
