//! Per-method fact collection.
//!
//! One pass over a method's statements records the capabilities passed to
//! `canIUse`, whether any exception handling appears, and every call to a
//! catalogued API. Guards count wherever they appear in the method.

use std::collections::{BTreeSet, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::capability::capabilities_in;
use crate::catalog::CapabilityCatalog;
use crate::ir::{signature, CallExpression, HasCallees, HasStatements};

/// The capability-check function.
pub const GUARD_FUNCTION: &str = "canIUse";

/// Marker the provider renders for a bound `catch` parameter.
pub const CAUGHT_EXCEPTION_MARKER: &str = "caughtexception";

static THROW_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*throw\b").unwrap());

/// Built-in runtime method names. Never reported as platform APIs, even if a
/// catalog happens to contain the same name.
static EXCLUDED_CALLEES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // console
        "log", "info", "warn", "error", "debug", "trace",
        // string
        "split", "replace", "replaceAll", "trim", "substring", "substr", "slice",
        "indexOf", "lastIndexOf", "includes", "startsWith", "endsWith", "charAt",
        "toUpperCase", "toLowerCase", "padStart", "padEnd", "match", "concat",
        "toString", "toFixed", "localeCompare",
        // array
        "push", "pop", "shift", "unshift", "splice", "map", "filter", "reduce",
        "forEach", "find", "findIndex", "some", "every", "join", "sort", "reverse",
        "flat", "flatMap", "fill", "at",
        // object, JSON, Math
        "keys", "values", "entries", "assign", "freeze", "hasOwnProperty",
        "stringify", "parse", "floor", "ceil", "round", "max", "min", "abs", "random",
        // Map / Set
        "get", "set", "has", "delete", "add", "clear",
        // promise
        "then", "catch", "finally", "resolve", "reject", "all", "allSettled", "race",
        "setTimeout", "setInterval", "clearTimeout", "clearInterval",
    ]
    .into_iter()
    .collect()
});

/// Whether `name` is a built-in runtime method.
pub fn is_excluded(name: &str) -> bool {
    EXCLUDED_CALLEES.contains(name)
}

/// Whether a statement rendering raises or catches an exception.
pub fn has_exception_marker(text: &str) -> bool {
    text.contains(CAUGHT_EXCEPTION_MARKER) || THROW_RE.is_match(text)
}

/// One observed call to a catalogued API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSighting {
    pub callee_name: String,
    pub arguments: Vec<String>,
    pub statement_text: String,
    pub call_text: String,
    pub enclosing_method_signature: String,
    pub source_file: Option<String>,
    pub line: Option<usize>,
}

/// Everything the classifier needs to know about one method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodFacts {
    pub method_signature: String,
    pub guarded_capabilities: BTreeSet<String>,
    pub has_exception_handling: bool,
    pub api_sightings: Vec<CallSighting>,
}

/// Collect facts for one method. Returns `None` for methods without a body or
/// with an empty body.
pub fn analyze_method<M, C>(method: &M, catalog: &C) -> Option<MethodFacts>
where
    M: HasStatements,
    C: CapabilityCatalog + ?Sized,
{
    let statements = method.statements().filter(|s| !s.is_empty())?;
    let method_signature = method.signature();
    let source_file = signature::file_qualifier(method_signature).map(str::to_string);

    let mut facts = MethodFacts {
        method_signature: method_signature.to_string(),
        ..Default::default()
    };

    for statement in statements {
        if has_exception_marker(statement.text()) {
            facts.has_exception_handling = true;
        }

        for call in statement.calls() {
            let Some(name) = call.callee_name() else {
                tracing::trace!(call = call.text(), "unresolved callee, skipping");
                continue;
            };

            if name == GUARD_FUNCTION {
                for arg in call.arguments() {
                    facts
                        .guarded_capabilities
                        .extend(capabilities_in(arg).map(str::to_string));
                }
                continue;
            }

            if is_excluded(name) || catalog.required_capability(name).is_none() {
                continue;
            }

            facts.api_sightings.push(CallSighting {
                callee_name: name.to_string(),
                arguments: call.arguments().to_vec(),
                statement_text: statement.text().to_string(),
                call_text: call.text().to_string(),
                enclosing_method_signature: method_signature.to_string(),
                source_file: source_file.clone(),
                line: call.position().or(statement.position()).map(|p| p.line),
            });
        }
    }

    tracing::debug!(
        method = method_signature,
        guards = facts.guarded_capabilities.len(),
        sightings = facts.api_sightings.len(),
        exception_handling = facts.has_exception_handling,
        "analyzed method"
    );

    Some(facts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::ir::{Call, Method, Statement};

    const SIG: &str = "entry/src/main/ets/pages/Index.ets: Index.locate()";
    const LOCATION_CORE: &str = "SystemCapability.Location.Location.Core";

    fn guard(cap: &str) -> Statement {
        Statement::new(format!("if (canIUse('{cap}'))"))
            .with_call(Call::named("canIUse").arg(format!("'{cap}'")))
    }

    fn locate() -> Statement {
        Statement::new("geoLocationManager.getCurrentLocation(request)")
            .with_call(Call::named("getCurrentLocation").arg("request").at(12, 5))
    }

    #[test]
    fn collects_guard_capabilities_and_sightings() {
        let method = Method::new(SIG, vec![guard(LOCATION_CORE), locate()]);
        let facts = analyze_method(&method, &Catalog::builtin()).unwrap();

        assert!(facts.guarded_capabilities.contains(LOCATION_CORE));
        assert_eq!(facts.api_sightings.len(), 1);
        let sighting = &facts.api_sightings[0];
        assert_eq!(sighting.callee_name, "getCurrentLocation");
        assert_eq!(sighting.line, Some(12));
        assert_eq!(
            sighting.source_file.as_deref(),
            Some("entry/src/main/ets/pages/Index.ets")
        );
        assert!(!facts.has_exception_handling);
    }

    #[test]
    fn guard_after_call_still_counts() {
        let method = Method::new(SIG, vec![locate(), guard(LOCATION_CORE)]);
        let facts = analyze_method(&method, &Catalog::builtin()).unwrap();
        assert!(facts.guarded_capabilities.contains(LOCATION_CORE));
    }

    #[test]
    fn guard_call_is_not_a_sighting() {
        let mut catalog = Catalog::builtin();
        catalog.insert("canIUse", LOCATION_CORE);
        let method = Method::new(SIG, vec![guard(LOCATION_CORE)]);
        let facts = analyze_method(&method, &catalog).unwrap();
        assert!(facts.api_sightings.is_empty());
    }

    #[test]
    fn exception_flag_is_monotonic() {
        let method = Method::new(
            SIG,
            vec![
                Statement::new("err = caughtexception"),
                locate(),
                Statement::new("let x = 1"),
            ],
        );
        let facts = analyze_method(&method, &Catalog::builtin()).unwrap();
        assert!(facts.has_exception_handling);
    }

    #[test]
    fn throw_statement_marks_exception_handling() {
        assert!(has_exception_marker("throw new Error('unsupported')"));
        assert!(has_exception_marker("  throw err"));
        assert!(!has_exception_marker("const thrower = 1"));
        assert!(!has_exception_marker("rethrow(err)"));
    }

    #[test]
    fn excluded_names_win_over_catalog() {
        let mut catalog = Catalog::new();
        catalog.insert("log", "SystemCapability.HiviewDFX.HiLog");
        let method = Method::new(
            SIG,
            vec![Statement::new("console.log('hi')").with_call(Call::named("log").arg("'hi'"))],
        );
        let facts = analyze_method(&method, &catalog).unwrap();
        assert!(facts.api_sightings.is_empty());
    }

    #[test]
    fn unresolved_callee_is_skipped() {
        let method = Method::new(
            SIG,
            vec![Statement::new("handlers[0]()").with_call(Call::unresolved("handlers[0]()"))],
        );
        let facts = analyze_method(&method, &Catalog::builtin()).unwrap();
        assert!(facts.api_sightings.is_empty());
        assert!(facts.guarded_capabilities.is_empty());
    }

    #[test]
    fn bodiless_and_empty_methods_are_skipped() {
        let catalog = Catalog::builtin();
        assert!(analyze_method(&Method::bodiless(SIG), &catalog).is_none());
        assert!(analyze_method(&Method::new(SIG, vec![]), &catalog).is_none());
    }

    #[test]
    fn statement_position_backs_up_call_position() {
        let method = Method::new(
            SIG,
            vec![Statement::new("getLastLocation()")
                .with_call(Call::named("getLastLocation"))
                .at(7, 3)],
        );
        let facts = analyze_method(&method, &Catalog::builtin()).unwrap();
        assert_eq!(facts.api_sightings[0].line, Some(7));
    }

    #[test]
    fn accepts_plain_map_catalog() {
        let mut catalog = std::collections::HashMap::new();
        catalog.insert(
            "startBLEScan".to_string(),
            "SystemCapability.Communication.Bluetooth.Core".to_string(),
        );
        let method = Method::new(
            SIG,
            vec![Statement::new("ble.startBLEScan(null)")
                .with_call(Call::named("startBLEScan").arg("null"))],
        );
        let facts = analyze_method(&method, &catalog).unwrap();
        assert_eq!(facts.api_sightings.len(), 1);
    }
}
