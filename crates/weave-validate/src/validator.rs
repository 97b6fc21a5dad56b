use weave_definitions::TargetClassDefinition;

use crate::findings::ValidationLog;
use crate::report::ValidationReport;
use crate::rule::{NodeKind, Rule, RuleCheck, RuleSet};
use crate::rules;

/// Runs installed rule sets over a definition graph.
#[derive(Debug)]
pub struct Validator {
    rule_sets: Vec<RuleSet>,
}

impl Default for Validator {
    /// A validator with every built-in rule set installed.
    fn default() -> Self {
        Validator { rule_sets: rules::builtin() }
    }
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A validator with no rules at all.
    pub fn empty() -> Self {
        Validator { rule_sets: Vec::new() }
    }

    pub fn with_rule_set(mut self, rule_set: RuleSet) -> Self {
        self.install(rule_set);
        self
    }

    pub fn install(&mut self, rule_set: RuleSet) {
        log::debug!("installing rule set `{}` ({} rule(s))", rule_set.name(), rule_set.rules().len());
        self.rule_sets.push(rule_set);
    }

    pub fn rule_sets(&self) -> &[RuleSet] {
        &self.rule_sets
    }

    /// Walks the graph once, applying every applicable rule to every node.
    pub fn validate(&self, definition: &TargetClassDefinition) -> ValidationReport {
        let mut log = ValidationLog::new();

        let target = definition.target.to_string();
        self.visit(NodeKind::TargetClass, &target, &mut log, |rule, log| {
            if let RuleCheck::TargetClass(check) = rule.check() {
                check(definition, log);
            }
        });

        for mixin in definition.mixins_in_order() {
            let location = mixin.mixin_type.to_string();
            self.visit(NodeKind::Mixin, &location, &mut log, |rule, log| {
                if let RuleCheck::Mixin(check) = rule.check() {
                    check(definition, mixin, log);
                }
            });
        }

        for member in &definition.members {
            let location = definition.member_path(member.id);
            self.visit(NodeKind::Member, &location, &mut log, |rule, log| {
                if let RuleCheck::Member(check) = rule.check() {
                    check(definition, member, log);
                }
            });
        }

        for dependency in &definition.dependencies {
            let location = format!(
                "{} -> {}",
                definition.mixin(dependency.requirer).mixin_type,
                dependency.required_type
            );
            self.visit(NodeKind::Dependency, &location, &mut log, |rule, log| {
                if let RuleCheck::Dependency(check) = rule.check() {
                    check(definition, dependency, log);
                }
            });
        }

        for required in &definition.required_types {
            let location = required.required_type.to_string();
            self.visit(NodeKind::RequiredType, &location, &mut log, |rule, log| {
                if let RuleCheck::RequiredType(check) = rule.check() {
                    check(definition, required, log);
                }
            });
        }

        let (findings, rules_run) = log.into_findings();
        let report = ValidationReport { target: definition.target.clone(), findings, rules_run };
        log::debug!(
            "validated `{}`: {} rule invocation(s), {} finding(s)",
            report.target,
            report.rules_run,
            report.findings.len()
        );
        report
    }

    fn visit<F>(&self, kind: NodeKind, location: &str, log: &mut ValidationLog, mut apply: F)
    where
        F: FnMut(&Rule, &mut ValidationLog),
    {
        for rule_set in &self.rule_sets {
            for rule in rule_set.rules_for(kind) {
                log.enter(rule.name(), kind, location);
                apply(rule, log);
                log.leave();
            }
        }
    }
}
