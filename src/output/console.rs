use crate::rules::policy::PolicyVerdict;
use crate::rules::{Finding, Report, Severity};

/// Render a report as console text, most severe findings first.
pub fn render(report: &Report, verdict: &PolicyVerdict) -> String {
    let mut output = String::new();

    if let Some(error) = &report.error {
        output.push_str(&format!("\n  Analysis aborted: {}\n\n", error));
        return output;
    }

    if report.findings.is_empty() {
        output.push_str("\n  No capability-gated API calls found.\n\n");
        return output;
    }

    let mut sorted: Vec<&Finding> = report.findings.iter().collect();
    sorted.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.resolved_file.cmp(&b.resolved_file))
            .then_with(|| a.resolved_line.cmp(&b.resolved_line))
    });

    output.push_str(&format!(
        "\n  {} API call site(s) checked:\n\n",
        report.findings.len()
    ));

    for finding in &sorted {
        let severity_tag = match finding.severity {
            Severity::Severe => "[SEVERE]   ",
            Severity::Advisory => "[ADVISORY] ",
            Severity::Compliant => "[OK]       ",
        };

        let location = match finding.resolved_line {
            Some(line) => format!("{}:{}", finding.file_or_unknown(), line),
            None => finding.file_or_unknown().to_string(),
        };

        output.push_str(&format!(
            "  {}{} in {}\n",
            severity_tag,
            finding.message(),
            finding.method()
        ));
        output.push_str(&format!("             at {}\n\n", location));
    }

    if !report.recommendations.is_empty() {
        output.push_str("  Recommendations:\n");
        for recommendation in &report.recommendations {
            output.push_str(&format!("    - {}\n", recommendation));
        }
        output.push('\n');
    }

    let s = &report.summary;
    output.push_str(&format!(
        "  Summary: {} API(s), {} finding(s): {} severe, {} advisory, {} compliant\n",
        s.distinct_apis, s.total_findings, s.severe, s.advisory, s.compliant
    ));
    output.push_str(&format!(
        "           guarded {} (correct {}), exception-wrapped {}\n\n",
        s.guarded, s.correctly_guarded, s.exception_wrapped
    ));

    let status = if verdict.pass { "PASS" } else { "FAIL" };
    output.push_str(&format!(
        "  Result: {} (threshold: {}, highest: {})\n\n",
        status,
        verdict.fail_threshold,
        verdict
            .highest_severity
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".into()),
    ));

    output
}
