use std::path::{Path, PathBuf};

use crate::config::ScanSettings;
use crate::error::{GuardError, Result};
use crate::ir::{Language, Program};
use crate::parser;

/// HarmonyOS / ArkTS project adapter.
///
/// Detects projects by looking for:
/// - `oh-package.json5`, `build-profile.json5`, `hvigorfile.ts` or `module.json5`
/// - any `.ets`, `.ts` or `.js` source below the root
pub struct ArkTsAdapter;

const PROJECT_MARKERS: &[&str] = &[
    "oh-package.json5",
    "build-profile.json5",
    "hvigorfile.ts",
    "module.json5",
];

const MAX_FILE_BYTES: u64 = 1_048_576;

impl super::Adapter for ArkTsAdapter {
    fn name(&self) -> &'static str {
        "ArkTS"
    }

    fn detect(&self, root: &Path) -> bool {
        if PROJECT_MARKERS.iter().any(|m| root.join(m).exists()) {
            return true;
        }
        walk(root, 6).any(|path| language_of(&path) != Language::Unknown)
    }

    fn load(&self, root: &Path, settings: &ScanSettings) -> Result<Program> {
        let excludes = settings.exclude_patterns()?;
        let mut program = Program::default();

        for path in source_files(root, &excludes) {
            let lang = language_of(&path);
            let Some(parser) = parser::parser_for_language(lang) else {
                return Err(GuardError::Load {
                    root: root.display().to_string(),
                    message: format!("no parser available for {lang} sources"),
                });
            };

            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "unreadable source file, skipping"
                    );
                    continue;
                }
            };

            let relative = path.strip_prefix(root).unwrap_or(&path);
            match parser.parse_file(relative, &content) {
                Ok(parsed) => program.methods.extend(parsed.methods),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to parse, skipping"
                    );
                }
            }
        }

        Ok(program)
    }
}

fn language_of(path: &Path) -> Language {
    path.extension()
        .map(|e| Language::from_extension(&e.to_string_lossy()))
        .unwrap_or(Language::Unknown)
}

fn walk(root: &Path, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    ignore::WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .max_depth(Some(max_depth))
        .build()
        .flatten()
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.into_path())
}

/// Source files below `root`, sorted, minus excluded and oversized files.
fn source_files(root: &Path, excludes: &[glob::Pattern]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walk(root, 16)
        .filter(|path| language_of(path) != Language::Unknown)
        .filter(|path| {
            let relative = path.strip_prefix(root).unwrap_or(path);
            !excludes.iter().any(|p| p.matches_path(relative))
        })
        .filter(|path| {
            let small = std::fs::metadata(path).is_ok_and(|m| m.len() <= MAX_FILE_BYTES);
            if !small {
                tracing::debug!(path = %path.display(), "skipping oversized or unreadable file");
            }
            small
        })
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::Adapter;
    use std::fs;

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let pages = dir.path().join("entry/src/main/ets/pages");
        fs::create_dir_all(&pages).unwrap();
        fs::write(pages.join("Index.ets"), "function a(): void {}\n").unwrap();
        fs::create_dir_all(dir.path().join("oh_modules/dep")).unwrap();
        fs::write(dir.path().join("oh_modules/dep/index.ts"), "function b(): void {}\n").unwrap();
        fs::write(dir.path().join("README.md"), "# demo\n").unwrap();
        dir
    }

    #[test]
    fn detects_by_marker_or_sources() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!ArkTsAdapter.detect(dir.path()));
        fs::write(dir.path().join("oh-package.json5"), "{}").unwrap();
        assert!(ArkTsAdapter.detect(dir.path()));
        assert!(ArkTsAdapter.detect(project().path()));
    }

    #[test]
    fn collects_sources_honoring_excludes() {
        let dir = project();
        let excludes = ScanSettings::default().exclude_patterns().unwrap();
        let files = source_files(dir.path(), &excludes);
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("entry/src/main/ets/pages/Index.ets"));
    }

    #[cfg(feature = "typescript")]
    #[test]
    fn signatures_use_project_relative_paths() {
        let dir = project();
        let program = ArkTsAdapter
            .load(dir.path(), &ScanSettings::default())
            .unwrap();
        let signatures: Vec<&str> = program.methods.iter().map(|m| m.signature.as_str()).collect();
        assert_eq!(signatures, vec!["entry/src/main/ets/pages/Index.ets: a()"]);
    }
}
