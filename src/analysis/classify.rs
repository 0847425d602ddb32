//! Turns per-method facts into findings and a report.

use std::collections::HashSet;

use super::location::LocationResolver;
use super::method::MethodFacts;
use crate::catalog::CapabilityCatalog;
use crate::rules::{Finding, Report, Severity};

/// Classify every (method, API) pair in `facts`. Repeated calls to the same
/// API within a method collapse into one finding placed at the first call.
pub fn classify<C>(facts: &[MethodFacts], catalog: &C, resolver: &mut LocationResolver) -> Report
where
    C: CapabilityCatalog + ?Sized,
{
    let mut findings = Vec::new();

    for method in facts {
        let mut seen = HashSet::new();
        for sighting in &method.api_sightings {
            if !seen.insert(sighting.callee_name.as_str()) {
                continue;
            }
            let Some(required) = catalog.required_capability(&sighting.callee_name) else {
                continue;
            };

            let has_correct_guard = method.guarded_capabilities.contains(required);
            let is_exception_wrapped = method.has_exception_handling;

            findings.push(Finding {
                api_name: sighting.callee_name.clone(),
                required_capability: required.to_string(),
                severity: Severity::classify(has_correct_guard, is_exception_wrapped),
                is_guarded: !method.guarded_capabilities.is_empty(),
                has_correct_guard,
                is_exception_wrapped,
                guarded_capabilities: method.guarded_capabilities.iter().cloned().collect(),
                method_signature: method.method_signature.clone(),
                resolved_file: sighting.source_file.clone(),
                resolved_line: resolver.resolve(sighting),
                snippet: sighting.statement_text.clone(),
            });
        }
    }

    Report::new(findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::method::CallSighting;
    use crate::catalog::Catalog;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const CORE: &str = "SystemCapability.Location.Location.Core";
    const SIG: &str = "pages/Index.ets: Index.locate()";

    fn sighting(api: &str, line: Option<usize>) -> CallSighting {
        CallSighting {
            callee_name: api.into(),
            arguments: vec![],
            statement_text: format!("geoLocationManager.{api}()"),
            call_text: format!("geoLocationManager.{api}()"),
            enclosing_method_signature: SIG.into(),
            source_file: Some("pages/Index.ets".into()),
            line,
        }
    }

    fn facts(guards: &[&str], wrapped: bool, sightings: Vec<CallSighting>) -> MethodFacts {
        MethodFacts {
            method_signature: SIG.into(),
            guarded_capabilities: guards.iter().map(|g| g.to_string()).collect(),
            has_exception_handling: wrapped,
            api_sightings: sightings,
        }
    }

    fn run(facts: &[MethodFacts]) -> Report {
        classify(facts, &Catalog::builtin(), &mut LocationResolver::new("/nonexistent"))
    }

    #[test]
    fn repeated_api_yields_one_finding_at_first_call() {
        let report = run(&[facts(
            &[],
            false,
            vec![
                sighting("getCurrentLocation", Some(4)),
                sighting("getLastLocation", Some(6)),
                sighting("getCurrentLocation", Some(9)),
            ],
        )]);
        assert_eq!(report.findings.len(), 2);
        assert_eq!(report.findings[0].api_name, "getCurrentLocation");
        assert_eq!(report.findings[0].resolved_line, Some(4));
        assert_eq!(report.summary.distinct_apis, 2);
    }

    #[test]
    fn same_api_in_two_methods_is_two_findings() {
        let mut other = facts(&[CORE], true, vec![sighting("getCurrentLocation", Some(20))]);
        other.method_signature = "pages/Index.ets: Index.refresh()".into();
        let report = run(&[
            facts(&[], true, vec![sighting("getCurrentLocation", Some(4))]),
            other,
        ]);
        assert_eq!(report.findings.len(), 2);
        assert_eq!(report.summary.distinct_apis, 1);
        assert_eq!(report.findings[0].severity, Severity::Advisory);
        assert_eq!(report.findings[1].severity, Severity::Compliant);
    }

    #[test]
    fn method_without_sightings_contributes_nothing() {
        let report = run(&[facts(&[CORE], true, vec![])]);
        assert!(report.findings.is_empty());
        assert_eq!(report.summary.total_findings, 0);
    }

    #[test]
    fn guard_matching_is_exact() {
        let report = run(&[facts(
            &["SystemCapability.Location.Location"],
            false,
            vec![sighting("getCurrentLocation", None)],
        )]);
        let finding = &report.findings[0];
        assert!(finding.is_guarded);
        assert!(!finding.has_correct_guard);
        assert_eq!(finding.severity, Severity::Severe);
        assert_eq!(report.summary.guarded, 1);
        assert_eq!(report.summary.correctly_guarded, 0);
    }

    #[test]
    fn summary_counts() {
        let mut wrapped = facts(&[CORE], true, vec![sighting("getCurrentLocation", Some(1))]);
        wrapped.method_signature = "a.ets: a()".into();
        let mut wrong = facts(
            &["SystemCapability.Sensors.Sensor"],
            true,
            vec![sighting("getLastLocation", Some(2))],
        );
        wrong.method_signature = "b.ets: b()".into();
        let mut bare = facts(&[], false, vec![sighting("isLocationEnabled", Some(3))]);
        bare.method_signature = "c.ets: c()".into();

        let report = run(&[wrapped, wrong, bare]);
        assert_eq!(
            report.summary,
            crate::rules::Summary {
                distinct_apis: 3,
                total_findings: 3,
                guarded: 2,
                correctly_guarded: 1,
                exception_wrapped: 2,
                severe: 1,
                advisory: 1,
                compliant: 1,
            }
        );
        assert_eq!(report.recommendations.len(), 2);
    }

    const APIS: &[&str] = &["getCurrentLocation", "getLastLocation", "getSimState", "log"];
    const GUARDS: &[&str] = &[
        CORE,
        "SystemCapability.Sensors.Sensor",
        "SystemCapability.Telephony.CoreService",
    ];

    fn method_facts() -> impl Strategy<Value = MethodFacts> {
        (
            proptest::sample::subsequence(GUARDS, 0..=GUARDS.len()),
            any::<bool>(),
            proptest::collection::vec(
                (
                    proptest::sample::select(APIS),
                    proptest::option::of(1usize..200),
                ),
                0..6,
            ),
        )
            .prop_map(|(guards, wrapped, sightings)| {
                let sightings = sightings
                    .into_iter()
                    .map(|(api, line)| sighting(api, line))
                    .collect();
                facts(&guards, wrapped, sightings)
            })
    }

    proptest! {
        #[test]
        fn classification_is_idempotent(
            methods in proptest::collection::vec(method_facts(), 0..4)
        ) {
            let input: Vec<MethodFacts> = methods
                .into_iter()
                .enumerate()
                .map(|(i, mut m)| {
                    m.method_signature = format!("pages/Index.ets: Index.m{i}()");
                    m
                })
                .collect();
            let catalog = Catalog::builtin();
            let mut resolver = LocationResolver::new("/nonexistent");
            let first = classify(&input, &catalog, &mut resolver);
            let second = classify(&input, &catalog, &mut resolver);
            let fresh = classify(&input, &catalog, &mut LocationResolver::new("/nonexistent"));
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(&first, &fresh);
            let sighted: usize = input.iter().map(|m| m.api_sightings.len()).sum();
            prop_assert!(first.findings.len() <= sighted);
        }
    }
}
