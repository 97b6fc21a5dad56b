use std::fmt;

use miette::Diagnostic;
use thiserror::Error;
use weave_catalog::TypeName;

use crate::findings::{Severity, ValidationFinding};

/// Everything the validator found for one target class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub target: TypeName,
    pub findings: Vec<ValidationFinding>,
    /// Number of rule invocations performed.
    pub rules_run: usize,
}

impl ValidationReport {
    /// A report without errors. Warnings do not fail validation.
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationFinding> + '_ {
        self.findings.iter().filter(|finding| finding.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationFinding> + '_ {
        self.findings.iter().filter(|finding| finding.severity == Severity::Warning)
    }

    pub fn into_result(self) -> Result<ValidationReport, ValidationFailure> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(ValidationFailure::new(self))
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.errors().count();
        let warnings = self.warnings().count();
        writeln!(f, "{}: {} error(s), {} warning(s)", self.target, errors, warnings)?;
        for finding in &self.findings {
            writeln!(f, "  {} [{}] {}", finding.severity, finding.rule, finding)?;
        }
        Ok(())
    }
}

/// A configuration that must not be generated.
///
/// Carries the complete report; every finding is attached as a related
/// diagnostic.
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("Validation failed: `{target}` has {error_count} error(s)")]
#[diagnostic(
    code(weave_validate::validation_failed),
    help("No type is generated for a configuration that fails validation")
)]
pub struct ValidationFailure {
    pub target: TypeName,
    pub error_count: usize,
    #[related]
    pub findings: Vec<ValidationFinding>,
    pub report: ValidationReport,
}

impl ValidationFailure {
    pub fn new(report: ValidationReport) -> Self {
        ValidationFailure {
            target: report.target.clone(),
            error_count: report.errors().count(),
            findings: report.findings.clone(),
            report,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationFinding> + '_ {
        self.report.errors()
    }
}
