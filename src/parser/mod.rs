#[cfg(feature = "typescript")]
pub mod arkts;

use std::path::Path;

use crate::error::Result;
use crate::ir::{Language, Method};

/// Result of parsing a single source file.
#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    pub methods: Vec<Method>,
}

/// Language parser trait. Each parser lowers a source file into methods,
/// statements and call expressions.
pub trait LanguageParser: Send + Sync {
    fn language(&self) -> Language;

    /// `path` is the project-relative path used in method signatures.
    fn parse_file(&self, path: &Path, content: &str) -> Result<ParsedFile>;
}

/// Get the appropriate parser for a language.
pub fn parser_for_language(lang: Language) -> Option<Box<dyn LanguageParser>> {
    match lang {
        #[cfg(feature = "typescript")]
        Language::ArkTs | Language::TypeScript | Language::JavaScript => {
            Some(Box::new(arkts::ArkTsParser))
        }
        _ => None,
    }
}
