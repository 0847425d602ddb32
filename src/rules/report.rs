use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Finding, Severity};

/// Result of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub findings: Vec<Finding>,
    pub recommendations: Vec<String>,
    pub summary: Summary,
    /// Set when the run aborted before any method was analyzed.
    pub error: Option<String>,
}

/// Counts over a run's findings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Distinct API names with at least one finding.
    pub distinct_apis: usize,
    pub total_findings: usize,
    /// Findings whose method checks any capability.
    pub guarded: usize,
    /// Findings whose method checks exactly the required capability.
    pub correctly_guarded: usize,
    pub exception_wrapped: usize,
    pub severe: usize,
    pub advisory: usize,
    pub compliant: usize,
}

impl Summary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let count = |pred: &dyn Fn(&Finding) -> bool| findings.iter().filter(|f| pred(*f)).count();
        Self {
            distinct_apis: findings
                .iter()
                .map(|f| f.api_name.as_str())
                .collect::<BTreeSet<_>>()
                .len(),
            total_findings: findings.len(),
            guarded: count(&|f: &Finding| f.is_guarded),
            correctly_guarded: count(&|f: &Finding| f.has_correct_guard),
            exception_wrapped: count(&|f: &Finding| f.is_exception_wrapped),
            severe: count(&|f: &Finding| f.severity == Severity::Severe),
            advisory: count(&|f: &Finding| f.severity == Severity::Advisory),
            compliant: count(&|f: &Finding| f.severity == Severity::Compliant),
        }
    }
}

impl Report {
    /// Build a report, deriving recommendations and counts from `findings`.
    pub fn new(findings: Vec<Finding>) -> Self {
        let recommendations = findings.iter().filter_map(Finding::recommendation).collect();
        let summary = Summary::from_findings(&findings);
        Self {
            findings,
            recommendations,
            summary,
            error: None,
        }
    }

    /// A report for a run that could not load the program.
    pub fn aborted(message: impl std::fmt::Display) -> Self {
        let message = message.to_string();
        Self {
            recommendations: vec![format!("Analysis aborted: {message}")],
            error: Some(message),
            ..Default::default()
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.error.is_some()
    }

    pub fn highest_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aborted_report_has_only_the_error() {
        let report = Report::aborted("project root does not exist");
        assert!(report.is_aborted());
        assert!(report.findings.is_empty());
        assert_eq!(report.summary, Summary::default());
        assert_eq!(
            report.recommendations,
            vec!["Analysis aborted: project root does not exist".to_string()]
        );
    }

    #[test]
    fn empty_report() {
        let report = Report::new(vec![]);
        assert!(!report.is_aborted());
        assert!(report.recommendations.is_empty());
        assert_eq!(report.highest_severity(), None);
    }
}
