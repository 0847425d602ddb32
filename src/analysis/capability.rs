//! Capability identifier extraction.
//!
//! A capability identifier is `SystemCapability` followed by one or more
//! dot-separated alphanumeric segments, e.g.
//! `SystemCapability.Location.Location.Core`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Namespace prefix every capability identifier starts with.
pub const CAPABILITY_PREFIX: &str = "SystemCapability";

static CAPABILITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"SystemCapability(?:\.[A-Za-z0-9_]+)+").unwrap());

/// First capability identifier embedded in `text`.
pub fn extract_capability(text: &str) -> Option<&str> {
    CAPABILITY_RE.find(text).map(|m| m.as_str())
}

/// Every capability identifier embedded in `text`, in order.
pub fn capabilities_in(text: &str) -> impl Iterator<Item = &str> {
    CAPABILITY_RE.find_iter(text).map(|m| m.as_str())
}
