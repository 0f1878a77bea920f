//! Coverage Gate
//!
//! Runs import → exclusion → completeness check → export for one set of raw
//! measurements. The only failure it can produce is a
//! [`CompletenessError`]; loading inputs and writing the artifact are left to
//! the caller.

use crate::check::{check_complete, CompletenessError};
use crate::coverage::{export_profiles, import_profiles, CoverageStats, ProfileSet, RawProfile};
use crate::exclusion::{apply_exclusions, ExclusionSink, ExclusionSummary};
use crate::facts::SourceFacts;

/// Result of a passing gate run
#[derive(Debug, Clone)]
pub struct GateReport {
    /// Surviving profiles, ready to be written as the filtered artifact
    pub profiles: Vec<RawProfile>,
    /// Newly excluded items per pass
    pub summary: ExclusionSummary,
    /// Statement totals over the surviving profiles
    pub stats: CoverageStats,
}

/// Applies one fact set to raw measurements
#[derive(Debug, Clone, Copy)]
pub struct Gate<'a> {
    facts: &'a SourceFacts,
}

impl<'a> Gate<'a> {
    /// Create a gate for the given facts
    #[must_use]
    pub const fn new(facts: &'a SourceFacts) -> Self {
        Self { facts }
    }

    /// Import and run every exclusion pass, returning the flagged model
    pub fn exclude(
        &self,
        raw: &[RawProfile],
        sink: &mut dyn ExclusionSink,
    ) -> (ProfileSet, ExclusionSummary) {
        let mut profiles = import_profiles(raw);
        tracing::debug!(profiles = profiles.len(), "imported coverage profiles");
        let summary = apply_exclusions(&mut profiles, self.facts, sink);
        (profiles, summary)
    }

    /// Run the full gate.
    ///
    /// Exclusion events go to `sink` as they happen. On success the filtered
    /// profiles are returned; otherwise every violation is returned at once.
    pub fn run(
        &self,
        raw: &[RawProfile],
        sink: &mut dyn ExclusionSink,
    ) -> Result<GateReport, CompletenessError> {
        let (profiles, summary) = self.exclude(raw, sink);
        check_complete(&profiles, self.facts)?;
        let exported = export_profiles(&profiles);
        let stats = CoverageStats::from_profiles(&exported);
        tracing::info!(
            files = stats.files,
            statements = stats.statements,
            covered = stats.covered_statements,
            "coverage gate passed"
        );
        Ok(GateReport {
            profiles: exported,
            summary,
            stats,
        })
    }
}
