use serde::{Deserialize, Serialize};

use super::{Report, Severity};

/// Policy verdict: the final pass/fail decision for a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyVerdict {
    pub pass: bool,
    pub total_findings: usize,
    /// Findings at or above the threshold.
    pub failing_findings: usize,
    pub highest_severity: Option<Severity>,
    pub fail_threshold: Severity,
}

/// Policy configuration loaded from `.syscapguard.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// Minimum severity to fail the scan.
    #[serde(default = "default_fail_on")]
    pub fail_on: Severity,
}

fn default_fail_on() -> Severity {
    Severity::Severe
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            fail_on: default_fail_on(),
        }
    }
}

impl Policy {
    /// Evaluate a report against this policy. Aborted runs never pass.
    pub fn evaluate(&self, report: &Report) -> PolicyVerdict {
        let failing = report
            .findings
            .iter()
            .filter(|f| f.severity != Severity::Compliant && f.severity >= self.fail_on)
            .count();

        PolicyVerdict {
            pass: failing == 0 && !report.is_aborted(),
            total_findings: report.findings.len(),
            failing_findings: failing,
            highest_severity: report.highest_severity(),
            fail_threshold: self.fail_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Finding;

    fn make_finding(severity: Severity) -> Finding {
        Finding {
            api_name: "getCurrentLocation".into(),
            required_capability: "SystemCapability.Location.Location.Core".into(),
            severity,
            is_guarded: false,
            has_correct_guard: severity == Severity::Compliant,
            is_exception_wrapped: severity == Severity::Advisory,
            guarded_capabilities: vec![],
            method_signature: "Index.ets: Index.locate()".into(),
            resolved_file: Some("Index.ets".into()),
            resolved_line: Some(3),
            snippet: String::new(),
        }
    }

    #[test]
    fn default_policy_fails_on_severe() {
        let report = Report::new(vec![make_finding(Severity::Severe)]);
        let verdict = Policy::default().evaluate(&report);
        assert!(!verdict.pass);
        assert_eq!(verdict.failing_findings, 1);
    }

    #[test]
    fn default_policy_passes_on_advisory() {
        let report = Report::new(vec![make_finding(Severity::Advisory)]);
        assert!(Policy::default().evaluate(&report).pass);
    }

    #[test]
    fn advisory_threshold_fails_on_advisory() {
        let policy = Policy {
            fail_on: Severity::Advisory,
        };
        let report = Report::new(vec![
            make_finding(Severity::Advisory),
            make_finding(Severity::Compliant),
        ]);
        let verdict = policy.evaluate(&report);
        assert!(!verdict.pass);
        assert_eq!(verdict.failing_findings, 1);
        assert_eq!(verdict.highest_severity, Some(Severity::Advisory));
    }

    #[test]
    fn compliant_never_fails() {
        let policy = Policy {
            fail_on: Severity::Compliant,
        };
        let report = Report::new(vec![make_finding(Severity::Compliant)]);
        assert!(policy.evaluate(&report).pass);
    }

    #[test]
    fn aborted_run_fails() {
        let verdict = Policy::default().evaluate(&Report::aborted("no project"));
        assert!(!verdict.pass);
        assert_eq!(verdict.total_findings, 0);
    }
}
