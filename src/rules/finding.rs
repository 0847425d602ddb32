use serde::{Deserialize, Serialize};

use crate::analysis::method::GUARD_FUNCTION;
use crate::ir::signature;

/// One classified (method, API) usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Callee name as catalogued (e.g., "getCurrentLocation").
    pub api_name: String,
    /// Capability the API requires.
    pub required_capability: String,
    /// Verdict from the guard/exception decision table.
    pub severity: Severity,
    /// The method checks some capability, not necessarily the right one.
    pub is_guarded: bool,
    /// The method checks exactly `required_capability`.
    pub has_correct_guard: bool,
    /// The method raises or catches an exception somewhere.
    pub is_exception_wrapped: bool,
    /// Capabilities the method checks, sorted.
    pub guarded_capabilities: Vec<String>,
    /// Signature of the enclosing method.
    pub method_signature: String,
    /// Source file, if the method signature names one.
    pub resolved_file: Option<String>,
    /// 1-based line of the first call in the method, if recoverable.
    pub resolved_line: Option<usize>,
    /// Statement containing the first call.
    pub snippet: String,
}

/// Severity, ordered from least to most serious.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Compliant,
    Advisory,
    Severe,
}

impl Severity {
    /// Decision table: the correct guard makes a call compliant; otherwise
    /// exception handling downgrades it from severe to advisory.
    pub fn classify(has_correct_guard: bool, is_exception_wrapped: bool) -> Self {
        match (has_correct_guard, is_exception_wrapped) {
            (false, false) => Self::Severe,
            (false, true) => Self::Advisory,
            (true, _) => Self::Compliant,
        }
    }

    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "compliant" | "ok" => Some(Self::Compliant),
            "advisory" | "warning" | "warn" => Some(Self::Advisory),
            "severe" | "error" => Some(Self::Severe),
            _ => None,
        }
    }

    /// Stable rule identifier for non-compliant findings.
    pub fn rule_id(&self) -> Option<&'static str> {
        match self {
            Self::Severe => Some("SYSCAP-001"),
            Self::Advisory => Some("SYSCAP-002"),
            Self::Compliant => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compliant => write!(f, "compliant"),
            Self::Advisory => write!(f, "advisory"),
            Self::Severe => write!(f, "severe"),
        }
    }
}

impl Finding {
    /// `Class.method()` part of the enclosing signature.
    pub fn method(&self) -> &str {
        signature::member(&self.method_signature)
    }

    pub fn file_or_unknown(&self) -> &str {
        self.resolved_file.as_deref().unwrap_or("unknown")
    }

    /// One-line description of the verdict.
    pub fn message(&self) -> String {
        match self.severity {
            Severity::Severe => format!(
                "'{}' called without a capability guard or exception handling",
                self.api_name
            ),
            Severity::Advisory => format!(
                "'{}' called without a {}('{}') guard",
                self.api_name, GUARD_FUNCTION, self.required_capability
            ),
            Severity::Compliant => format!(
                "'{}' guarded by {}('{}')",
                self.api_name, GUARD_FUNCTION, self.required_capability
            ),
        }
    }

    /// Remediation text for non-compliant findings.
    pub fn recommendation(&self) -> Option<String> {
        let cap = &self.required_capability;
        let mut text = match self.severity {
            Severity::Compliant => return None,
            Severity::Severe => format!(
                "{}: method '{}' calls '{}' without a {GUARD_FUNCTION}('{cap}') guard or exception handling. \
                 Check {GUARD_FUNCTION}('{cap}') before the call and wrap it in try/catch.",
                self.file_or_unknown(),
                self.method(),
                self.api_name,
            ),
            Severity::Advisory => format!(
                "{}: method '{}' calls '{}' without a {GUARD_FUNCTION}('{cap}') guard. \
                 Check {GUARD_FUNCTION}('{cap}') before the call.",
                self.file_or_unknown(),
                self.method(),
                self.api_name,
            ),
        };
        if self.is_guarded {
            text.push_str(&format!(
                " The method only checks {}, which does not match.",
                self.guarded_capabilities.join(", ")
            ));
        }
        Some(text)
    }
}
