//! Guard analysis: method facts → located findings → report.

pub mod capability;
pub mod classify;
pub mod location;
pub mod method;

use std::path::Path;

use crate::catalog::CapabilityCatalog;
use crate::ir::ProgramRepresentation;
use crate::rules::Report;

pub use classify::classify;
pub use location::LocationResolver;
pub use method::{analyze_method, CallSighting, MethodFacts};

/// Analyze every method of `program`. Relative source files named in method
/// signatures are read from `source_root` when a call has no position.
pub fn analyze<P, C>(program: &P, catalog: &C, source_root: &Path) -> Report
where
    P: ProgramRepresentation,
    C: CapabilityCatalog + ?Sized,
{
    let facts: Vec<MethodFacts> = program
        .methods()
        .filter_map(|m| analyze_method(m, catalog))
        .collect();

    let mut resolver = LocationResolver::new(source_root);
    let report = classify(&facts, catalog, &mut resolver);

    tracing::debug!(
        methods = facts.len(),
        findings = report.summary.total_findings,
        "analysis complete"
    );

    report
}
