use crate::rule::{Rule, RuleSet};

pub fn dependency_rules() -> RuleSet {
    RuleSet::new("dependency")
        .with_rule(Rule::dependency("dependency.resolved", |_, dependency, log| {
            if dependency.is_resolved() {
                return;
            }
            if dependency.problems.is_empty() {
                log.error(format!("{} dependency has no implementer", dependency.kind));
            }
            for problem in &dependency.problems {
                log.error(problem.to_string());
            }
        }))
        .with_rule(Rule::dependency("dependency.single-implementer", |definition, dependency, log| {
            if dependency.implementers.len() > 1 && !dependency.is_aggregate {
                let implementers: Vec<String> = dependency
                    .implementers
                    .iter()
                    .map(|participant| format!("`{}`", definition.participant_type(*participant)))
                    .collect();
                log.error(format!("satisfied by {} but the required type is not aggregate", implementers.join(", ")));
            }
        }))
}
