//! Best-effort line recovery for API sightings.
//!
//! Resolution never fails: a sighting that cannot be placed simply has no
//! line. Source files are read at most once per resolver.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::method::CallSighting;
use crate::ir::signature;

// `path/to/File.ets:12:5`
static POSITION_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w./\\@-]+\.[A-Za-z0-9]+:(\d+):(\d+)").unwrap());

// `async locate(req: Request): Promise<void> {`, `function lookup() {`
static METHOD_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:@\w+(?:\([^)]*\))?\s+)*(?:(?:export|default|public|private|protected|static|async|override|abstract|declare)\s+)*(?:function\s*\*?\s*)?([A-Za-z_$][\w$]*)\s*(?:<[^>]*>)?\s*\([^)]*\)\s*(?::[^{]+)?\{",
    )
    .unwrap()
});

// `const handler = async (req) => {`
static ARROW_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*(?::[^=]+)?=\s*(?:async\s*)?(?:\([^)]*\)|[A-Za-z_$][\w$]*)\s*(?::[^=]+)?=>",
    )
    .unwrap()
});

const CONTROL_KEYWORDS: &[&str] = &["if", "for", "while", "switch", "catch", "with", "return"];

/// Resolves sighting lines, caching source file contents per path.
#[derive(Debug, Default)]
pub struct LocationResolver {
    root: PathBuf,
    cache: HashMap<PathBuf, Option<Arc<[String]>>>,
}

impl LocationResolver {
    /// Relative source files are resolved against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    /// Recover a 1-based line for `sighting`, trying in order: a position
    /// token embedded in its text, the provider position, then a scan of the
    /// source file.
    pub fn resolve(&mut self, sighting: &CallSighting) -> Option<usize> {
        if let Some(line) =
            embedded_line(&sighting.statement_text).or_else(|| embedded_line(&sighting.call_text))
        {
            return Some(line);
        }
        if let Some(line) = sighting.line {
            return Some(line);
        }

        let file = sighting.source_file.as_deref()?;
        let lines = self.lines(Path::new(file))?;
        let method = signature::method_name(&sighting.enclosing_method_signature);
        scan_for_call(&lines, &sighting.callee_name, method)
    }

    fn lines(&mut self, file: &Path) -> Option<Arc<[String]>> {
        let path = self.root.join(file);
        self.cache
            .entry(path)
            .or_insert_with_key(|path| match std::fs::read_to_string(path) {
                Ok(content) => Some(content.lines().map(str::to_string).collect()),
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "source file unreadable");
                    None
                }
            })
            .clone()
    }
}

/// Line number from a `file:line:column` token embedded in `text`.
pub fn embedded_line(text: &str) -> Option<usize> {
    POSITION_TOKEN_RE
        .captures(text)
        .and_then(|c| c[1].parse::<usize>().ok())
        .filter(|&line| line >= 1)
}

/// First non-comment line calling `callee` inside `method`; failing that, the
/// first non-comment line calling `callee` at all.
fn scan_for_call(lines: &[String], callee: &str, method: &str) -> Option<usize> {
    let mut fallback = None;
    for (idx, line) in lines.iter().enumerate() {
        if is_comment(line) || !line.contains('(') || !mentions(line, callee) {
            continue;
        }
        if inside_method(&lines[..=idx], method) {
            return Some(idx + 1);
        }
        fallback.get_or_insert(idx + 1);
    }
    fallback
}

/// Walk backward from the last line looking for `method`'s declaration.
/// Crossing any other declaration ends the search.
fn inside_method(lines: &[String], method: &str) -> bool {
    for line in lines.iter().rev() {
        if is_comment(line) {
            continue;
        }
        if line.contains('(') && mentions(line, method) {
            return true;
        }
        if declared_name(line).is_some() {
            return false;
        }
    }
    false
}

/// Name declared by a function or method header line. Capitalised names are
/// left out since they are UI component invocations (`Column() {`).
fn declared_name(line: &str) -> Option<&str> {
    let name = METHOD_DECL_RE
        .captures(line)
        .or_else(|| ARROW_DECL_RE.captures(line))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())?;
    if CONTROL_KEYWORDS.contains(&name) || name.starts_with(|c: char| c.is_ascii_uppercase()) {
        return None;
    }
    Some(name)
}

fn is_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*')
}

/// Whether `ident` appears in `line` as a whole identifier.
fn mentions(line: &str, ident: &str) -> bool {
    if ident.is_empty() {
        return false;
    }
    let is_ident_char = |c: char| c.is_alphanumeric() || c == '_' || c == '$';
    line.match_indices(ident).any(|(start, _)| {
        let before = line[..start].chars().next_back();
        let after = line[start + ident.len()..].chars().next();
        !before.is_some_and(is_ident_char) && !after.is_some_and(is_ident_char)
    })
}
