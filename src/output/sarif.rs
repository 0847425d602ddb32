use std::collections::BTreeSet;

use serde_json::{json, Value};

use crate::error::Result;
use crate::rules::{Report, Severity};

/// Render non-compliant findings as SARIF 2.1.0.
///
/// Produces a self-contained SARIF log compatible with GitHub Code Scanning
/// and other SARIF consumers. Compliant call sites are not results.
pub fn render(report: &Report, target_name: &str) -> Result<String> {
    let flagged: Vec<_> = report
        .findings
        .iter()
        .filter_map(|f| f.severity.rule_id().map(|id| (id, f)))
        .collect();

    let rules: Vec<Value> = flagged
        .iter()
        .map(|(_, f)| f.severity)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .filter_map(|severity| {
            let id = severity.rule_id()?;
            Some(json!({
                "id": id,
                "name": rule_name(severity),
                "shortDescription": { "text": rule_name(severity) },
                "defaultConfiguration": {
                    "level": severity_to_sarif_level(severity),
                },
            }))
        })
        .collect();

    let results: Vec<Value> = flagged
        .iter()
        .map(|(rule_id, f)| {
            let mut result = json!({
                "ruleId": rule_id,
                "level": severity_to_sarif_level(f.severity),
                "message": { "text": format!("{} in {}", f.message(), f.method()) },
                "properties": {
                    "api": f.api_name,
                    "requiredCapability": f.required_capability,
                    "guardedCapabilities": f.guarded_capabilities,
                    "exceptionWrapped": f.is_exception_wrapped,
                },
            });

            if let Some(file) = &f.resolved_file {
                let mut location = json!({
                    "physicalLocation": {
                        "artifactLocation": { "uri": file },
                    },
                });
                if let Some(line) = f.resolved_line {
                    location["physicalLocation"]["region"] = json!({ "startLine": line });
                }
                result["locations"] = json!([location]);
            }

            if let Some(recommendation) = f.recommendation() {
                result["fixes"] = json!([{
                    "description": { "text": recommendation },
                }]);
            }

            result
        })
        .collect();

    let mut run = json!({
        "tool": {
            "driver": {
                "name": "syscap-guard",
                "version": env!("CARGO_PKG_VERSION"),
                "semanticVersion": env!("CARGO_PKG_VERSION"),
                "rules": rules,
            },
        },
        "results": results,
        "automationDetails": {
            "id": format!("syscap-guard/{}", target_name),
            "guid": uuid::Uuid::new_v4().to_string(),
        },
    });

    if let Some(error) = &report.error {
        run["invocations"] = json!([{
            "executionSuccessful": false,
            "toolExecutionNotifications": [{
                "level": "error",
                "message": { "text": error },
            }],
        }]);
    }

    let sarif = json!({
        "$schema": "https://docs.oasis-open.org/sarif/sarif/v2.1.0/errata01/os/schemas/sarif-schema-2.1.0.json",
        "version": "2.1.0",
        "runs": [run],
    });

    let output = serde_json::to_string_pretty(&sarif)?;
    Ok(output)
}

fn rule_name(severity: Severity) -> &'static str {
    match severity {
        Severity::Severe => "Unguarded and unhandled capability API call",
        Severity::Advisory => "Capability API call without canIUse guard",
        Severity::Compliant => "Guarded capability API call",
    }
}

fn severity_to_sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Severe => "error",
        Severity::Advisory => "warning",
        Severity::Compliant => "none",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Finding;

    fn finding(api: &str, severity: Severity, line: Option<usize>) -> Finding {
        Finding {
            api_name: api.into(),
            required_capability: "SystemCapability.Location.Location.Core".into(),
            severity,
            is_guarded: false,
            has_correct_guard: severity == Severity::Compliant,
            is_exception_wrapped: severity == Severity::Advisory,
            guarded_capabilities: vec![],
            method_signature: "pages/Index.ets: Index.locate()".into(),
            resolved_file: Some("pages/Index.ets".into()),
            resolved_line: line,
            snippet: String::new(),
        }
    }

    #[test]
    fn compliant_findings_are_not_results() {
        let report = Report::new(vec![
            finding("getCurrentLocation", Severity::Severe, Some(4)),
            finding("getLastLocation", Severity::Advisory, None),
            finding("isLocationEnabled", Severity::Compliant, Some(8)),
        ]);
        let value: Value = serde_json::from_str(&render(&report, "demo").unwrap()).unwrap();
        let run = &value["runs"][0];

        let results = run["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["ruleId"], "SYSCAP-001");
        assert_eq!(results[0]["level"], "error");
        assert_eq!(
            results[0]["locations"][0]["physicalLocation"]["region"]["startLine"],
            4
        );
        assert_eq!(results[1]["ruleId"], "SYSCAP-002");
        assert!(results[1]["locations"][0]["physicalLocation"]
            .get("region")
            .is_none());

        let rules = run["tool"]["driver"]["rules"].as_array().unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0]["id"], "SYSCAP-001");
    }

    #[test]
    fn aborted_run_reports_notification() {
        let report = Report::aborted("no project");
        let value: Value = serde_json::from_str(&render(&report, "demo").unwrap()).unwrap();
        let invocation = &value["runs"][0]["invocations"][0];
        assert_eq!(invocation["executionSuccessful"], false);
        assert_eq!(
            invocation["toolExecutionNotifications"][0]["message"]["text"],
            "no project"
        );
    }
}
