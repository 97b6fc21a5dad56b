use weave_catalog::TypeKind;
use weave_definitions::DependencyKind;

use crate::rule::{Rule, RuleSet};

pub fn required_type_rules() -> RuleSet {
    RuleSet::new("required-type")
        .with_rule(Rule::required_type("required-type.known", |_, required, log| {
            if required.type_kind.is_none() {
                log.error(format!("{} type is not described in the type catalog", required.kind));
            }
        }))
        .with_rule(Rule::required_type("required-type.next-call-interface", |_, required, log| {
            if required.kind == DependencyKind::NextCall && required.type_kind == Some(TypeKind::Class) {
                log.error("a next-call type must be an interface");
            }
        }))
        .with_rule(Rule::required_type("required-type.face-shape", |_, required, log| {
            if required.kind == DependencyKind::Face
                && required.type_kind == Some(TypeKind::Class)
                && !required.target_is_assignable
            {
                log.error("a face class must be the target class or one of its base classes");
            }
        }))
}
