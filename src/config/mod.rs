use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::capability::extract_capability;
use crate::catalog::CatalogSettings;
use crate::error::{GuardError, Result};
use crate::rules::policy::Policy;

/// Top-level configuration from `.syscapguard.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub policy: Policy,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub scan: ScanSettings,
}

/// Which source files the project adapter collects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Glob patterns, matched against paths relative to the project root.
    #[serde(default = "default_excludes")]
    pub exclude: Vec<String>,
}

fn default_excludes() -> Vec<String> {
    [
        "**/oh_modules/**",
        "**/node_modules/**",
        "**/build/**",
        "**/.hvigor/**",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            exclude: default_excludes(),
        }
    }
}

impl ScanSettings {
    /// Compile the exclude patterns.
    pub fn exclude_patterns(&self) -> Result<Vec<glob::Pattern>> {
        self.exclude
            .iter()
            .map(|p| glob::Pattern::new(p).map_err(Into::into))
            .collect()
    }
}

impl Config {
    /// Load config from a TOML file. Returns default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.scan.exclude_patterns()?;
        config.validate_catalog()?;
        Ok(config)
    }

    /// Every `[catalog.apis]` value must be a complete capability identifier.
    fn validate_catalog(&self) -> Result<()> {
        for (api, capability) in &self.catalog.apis {
            if extract_capability(capability) != Some(capability.as_str()) {
                return Err(GuardError::Config(format!(
                    "catalog entry '{api}' maps to '{capability}', \
                     which is not a SystemCapability identifier"
                )));
            }
        }
        Ok(())
    }

    /// Generate a starter config file.
    pub fn starter_toml() -> &'static str {
        r#"# syscap-guard configuration

[policy]
# Minimum severity to fail the scan (compliant, advisory, severe).
fail_on = "severe"

[catalog]
# API names to leave out of the analysis.
# ignore = ["getCurrentLocation"]

# Extra or overriding API -> capability entries.
# [catalog.apis]
# "getBatteryInfo" = "SystemCapability.PowerManager.BatteryManager.Core"

[scan]
# Glob patterns (relative to the project root) to skip.
exclude = ["**/oh_modules/**", "**/node_modules/**", "**/build/**", "**/.hvigor/**"]
"#
    }
}
