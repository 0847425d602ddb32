//! Method signature strings: `<file>: <Class>.<name>()`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Name of the synthetic method holding a file's top-level statements.
pub const DEFAULT_METHOD: &str = "%dflt";

static SIGNATURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<file>.+?\.(?:ets|ts|tsx|js|jsx|mjs|cjs)): (?P<member>.+)$").unwrap()
});

/// Build a signature for a method in `file`, optionally owned by `class`.
pub fn format(file: &str, class: Option<&str>, name: &str) -> String {
    match class {
        Some(class) => format!("{file}: {class}.{name}()"),
        None => format!("{file}: {name}()"),
    }
}

/// The file part of a signature, if it carries one.
pub fn file_qualifier(signature: &str) -> Option<&str> {
    SIGNATURE_RE
        .captures(signature)
        .and_then(|c| c.name("file"))
        .map(|m| m.as_str())
}

/// The member part of a signature (`Class.name()`), or the whole string.
pub fn member(signature: &str) -> &str {
    SIGNATURE_RE
        .captures(signature)
        .and_then(|c| c.name("member"))
        .map(|m| m.as_str())
        .unwrap_or(signature)
}

/// The bare method name: `entry/Index.ets: Index.build()[2]` → `build`.
pub fn method_name(signature: &str) -> &str {
    let member = member(signature);
    let head = member.split('(').next().unwrap_or(member);
    head.rsplit('.').next().unwrap_or(head).trim()
}
