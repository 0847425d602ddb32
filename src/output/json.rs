use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::rules::policy::PolicyVerdict;
use crate::rules::Report;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    target: &'a str,
    #[serde(flatten)]
    report: &'a Report,
    verdict: &'a PolicyVerdict,
}

/// Render a report as JSON, stamped with the generation time.
pub fn render(report: &Report, verdict: &PolicyVerdict, target_name: &str) -> Result<String> {
    let json = JsonReport {
        generated_at: Utc::now(),
        target: target_name,
        report,
        verdict,
    };
    Ok(serde_json::to_string_pretty(&json)?)
}
