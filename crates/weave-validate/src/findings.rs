use std::fmt;

use miette::Diagnostic;

use crate::rule::NodeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One problem reported by one rule against one definition node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidationFinding {
    pub severity: Severity,
    /// Name of the rule that reported it.
    pub rule: String,
    pub node: NodeKind,
    /// The offending definition, e.g. `App.Order.Save()` for a member.
    pub location: String,
    pub message: String,
}

impl fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`: {}", self.node, self.location, self.message)
    }
}

impl std::error::Error for ValidationFinding {}

impl Diagnostic for ValidationFinding {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.rule))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.severity {
            Severity::Warning => miette::Severity::Warning,
            Severity::Error => miette::Severity::Error,
        })
    }
}

#[derive(Debug, Clone)]
struct Scope {
    rule: String,
    node: NodeKind,
    location: String,
}

/// The shared, append-only log rules write their findings to.
///
/// The validator points the log at the rule and node being checked before
/// each invocation, so a rule only supplies the message.
#[derive(Debug, Default)]
pub struct ValidationLog {
    findings: Vec<ValidationFinding>,
    scope: Option<Scope>,
    rules_run: usize,
}

impl ValidationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.report(Severity::Error, message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.report(Severity::Warning, message.into());
    }

    pub fn findings(&self) -> &[ValidationFinding] {
        &self.findings
    }

    pub fn rules_run(&self) -> usize {
        self.rules_run
    }

    pub(crate) fn enter(&mut self, rule: &str, node: NodeKind, location: &str) {
        self.rules_run += 1;
        self.scope = Some(Scope { rule: rule.to_string(), node, location: location.to_string() });
    }

    pub(crate) fn leave(&mut self) {
        self.scope = None;
    }

    pub(crate) fn into_findings(self) -> (Vec<ValidationFinding>, usize) {
        (self.findings, self.rules_run)
    }

    fn report(&mut self, severity: Severity, message: String) {
        let (rule, node, location) = match &self.scope {
            Some(scope) => (scope.rule.clone(), scope.node, scope.location.clone()),
            None => ("unscoped".to_string(), NodeKind::TargetClass, String::new()),
        };
        log::trace!("{severity} from `{rule}` on {node} `{location}`: {message}");
        self.findings.push(ValidationFinding { severity, rule, node, location, message });
    }
}
