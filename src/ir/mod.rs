//! Program representation consumed by the analyzer.
//!
//! Providers expose methods, statements and call expressions through the
//! traits below. Every field beyond the statement text is best-effort: a
//! provider may be unable to name a callee or place a call in the source, and
//! the analyzer treats those gaps as normal input rather than errors.

pub mod program;
pub mod signature;

use serde::{Deserialize, Serialize};

pub use program::{Call, Method, Program, Statement};

/// A whole program: an enumerable set of methods.
pub trait ProgramRepresentation {
    type Method: HasStatements;

    fn methods(&self) -> impl Iterator<Item = &Self::Method>;
}

/// A method with an optional body.
pub trait HasStatements {
    type Statement: HasCallees;

    /// Signature of the form `<file>: <Class>.<name>()`, unique per program.
    fn signature(&self) -> &str;

    /// Ordered statements, or `None` when the method has no body.
    fn statements(&self) -> Option<&[Self::Statement]>;
}

/// A statement: its textual rendering plus the calls it contains.
pub trait HasCallees {
    type Call: CallExpression;

    fn text(&self) -> &str;

    fn calls(&self) -> &[Self::Call];

    fn position(&self) -> Option<Position>;
}

/// A single call expression.
pub trait CallExpression {
    /// Resolved callee name, if the provider could determine one.
    fn callee_name(&self) -> Option<&str>;

    /// Textual rendering of each argument, in order.
    fn arguments(&self) -> &[String];

    fn text(&self) -> &str;

    fn position(&self) -> Option<Position>;
}

/// A 1-based line/column position inside a method's source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Programming language of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    ArkTs,
    TypeScript,
    JavaScript,
    Unknown,
}

impl Language {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "ets" => Self::ArkTs,
            "ts" | "tsx" => Self::TypeScript,
            "js" | "jsx" | "mjs" | "cjs" => Self::JavaScript,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ArkTs => write!(f, "ArkTS"),
            Self::TypeScript => write!(f, "TypeScript"),
            Self::JavaScript => write!(f, "JavaScript"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}
