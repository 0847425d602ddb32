//! syscap-guard: system-capability guard checker for ArkTS projects.
//!
//! Finds calls to capability-gated platform APIs and checks that each one is
//! guarded by `canIUse('SystemCapability.…')` and wrapped in exception
//! handling. Offline, console/JSON/SARIF output.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use syscapguard::{scan, ScanOptions};
//!
//! let options = ScanOptions::default();
//! let report = scan(Path::new("./my-harmony-app"), &options);
//! println!(
//!     "Pass: {}, Findings: {}",
//!     report.verdict.pass,
//!     report.report.findings.len()
//! );
//! ```

pub mod adapter;
pub mod analysis;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ir;
pub mod output;
pub mod parser;
pub mod rules;

use std::path::{Path, PathBuf};

use catalog::Catalog;
use config::Config;
use error::Result;
use output::OutputFormat;
use rules::policy::{Policy, PolicyVerdict};
use rules::{Report, Severity};

/// Name of the per-project config file.
pub const CONFIG_FILE_NAME: &str = ".syscapguard.toml";

/// Options for a scan invocation.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Path to config file (defaults to `.syscapguard.toml` in scan dir).
    pub config_path: Option<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
    /// CLI override for fail_on threshold.
    pub fail_on_override: Option<Severity>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            format: OutputFormat::Console,
            fail_on_override: None,
        }
    }
}

/// Complete scan report.
#[derive(Debug)]
pub struct ScanReport {
    pub target_name: String,
    pub report: Report,
    pub verdict: PolicyVerdict,
}

impl ScanReport {
    /// Process exit code: 0 pass, 1 policy failure, 2 aborted run.
    pub fn exit_code(&self) -> i32 {
        if self.report.is_aborted() {
            2
        } else if self.verdict.pass {
            0
        } else {
            1
        }
    }
}

/// Run a complete scan: load config, load the project, analyze, evaluate
/// policy.
///
/// Never fails outright. A bad config or an unloadable project yields an
/// aborted report carrying the error message.
pub fn scan(path: &Path, options: &ScanOptions) -> ScanReport {
    let target_name = path
        .canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".into());

    let config_path = options
        .config_path
        .clone()
        .unwrap_or_else(|| path.join(CONFIG_FILE_NAME));

    let (report, mut policy) = match run(path, &config_path) {
        Ok((report, policy)) => (report, policy),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "analysis aborted");
            (Report::aborted(&e), Policy::default())
        }
    };

    if let Some(fail_on) = options.fail_on_override {
        policy.fail_on = fail_on;
    }
    let verdict = policy.evaluate(&report);

    ScanReport {
        target_name,
        report,
        verdict,
    }
}

fn run(path: &Path, config_path: &Path) -> Result<(Report, Policy)> {
    let config = Config::load(config_path)?;
    let catalog = Catalog::with_settings(&config.catalog);
    tracing::debug!(apis = catalog.len(), "capability catalog ready");

    let program = adapter::auto_detect_and_load(path, &config.scan)?;
    let report = analysis::analyze(&program, &catalog, path);

    Ok((report, config.policy))
}

/// Render a scan report in the specified format.
pub fn render_report(report: &ScanReport, format: OutputFormat) -> Result<String> {
    output::render(
        &report.report,
        &report.verdict,
        format,
        &report.target_name,
    )
}
