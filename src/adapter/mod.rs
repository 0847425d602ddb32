pub mod arkts;

use std::path::Path;

use crate::config::ScanSettings;
use crate::error::{GuardError, Result};
use crate::ir::Program;

/// An adapter detects a project layout and loads its sources into the
/// program representation.
pub trait Adapter: Send + Sync {
    /// Human-readable project kind.
    fn name(&self) -> &'static str;

    /// Check if this adapter can handle the given directory.
    fn detect(&self, root: &Path) -> bool;

    /// Load the project's methods.
    fn load(&self, root: &Path, settings: &ScanSettings) -> Result<Program>;
}

/// All registered adapters.
pub fn all_adapters() -> Vec<Box<dyn Adapter>> {
    vec![Box::new(arkts::ArkTsAdapter)]
}

/// Auto-detect matching adapters and merge the programs they load.
///
/// Fails when the root is not a directory or no adapter could load it; that
/// is the one condition that aborts a whole run.
pub fn auto_detect_and_load(root: &Path, settings: &ScanSettings) -> Result<Program> {
    if !root.is_dir() {
        return Err(GuardError::Load {
            root: root.display().to_string(),
            message: "not a directory".into(),
        });
    }

    let mut program = Program::default();
    let mut loaded = false;
    let mut last_error = None;

    for adapter in all_adapters() {
        if !adapter.detect(root) {
            continue;
        }
        match adapter.load(root, settings) {
            Ok(p) => {
                tracing::debug!(
                    adapter = adapter.name(),
                    methods = p.methods.len(),
                    "loaded project"
                );
                program.methods.extend(p.methods);
                loaded = true;
            }
            Err(e) => {
                tracing::warn!(
                    adapter = adapter.name(),
                    error = %e,
                    "adapter failed to load, skipping"
                );
                last_error = Some(e);
            }
        }
    }

    if !loaded {
        return Err(last_error
            .unwrap_or_else(|| GuardError::NoProject(root.display().to_string())));
    }

    Ok(program)
}
