//! Exclusion Pipeline
//!
//! Seven independent passes mark profiles and blocks as exempt from the
//! completeness requirement:
//!
//! | Pass  | Facts                          | Match                                   |
//! |-------|--------------------------------|-----------------------------------------|
//! | unit  | `excluded_units`               | unit of the profile                     |
//! | file  | `excluded_files`               | exact file name                         |
//! | wrap  | `wrap_sites`                   | call line inside the block              |
//! | panic | `panic_sites`                  | call line inside the block              |
//! | block | `explicit_blocks`              | annotation line + 1 inside the block    |
//! | func  | `explicit_funcs`               | block overlaps the function span        |
//! | skip  | `skipped_ids` via `all_facts`  | resolved line inside the block          |
//!
//! Block-level passes only ever touch blocks with a zero hit count. Passes
//! commute: any order yields the same flags, and running them again changes
//! nothing.

mod event;
mod passes;
mod sink;

pub use event::{ExclusionEvent, ExclusionKind};
pub use passes::{
    exclude_blocks, exclude_files, exclude_funcs, exclude_panics, exclude_skips, exclude_units,
    exclude_wraps, run_pass,
};
pub use sink::{ExclusionSink, NullSink, RecordingSink, TracingSink};

use crate::coverage::ProfileSet;
use crate::facts::SourceFacts;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Newly excluded items per pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionSummary {
    counts: BTreeMap<ExclusionKind, usize>,
}

impl ExclusionSummary {
    /// Create an empty summary
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add to the count of a pass
    pub fn add(&mut self, kind: ExclusionKind, count: usize) {
        *self.counts.entry(kind).or_insert(0) += count;
    }

    /// Items newly excluded by `kind` (profiles for unit/file, blocks otherwise)
    #[must_use]
    pub fn count(&self, kind: ExclusionKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Profiles newly excluded by the unit and file passes
    #[must_use]
    pub fn profiles_excluded(&self) -> usize {
        self.counts
            .iter()
            .filter(|(k, _)| k.is_profile_level())
            .map(|(_, n)| n)
            .sum()
    }

    /// Blocks newly excluded by the block-level passes
    #[must_use]
    pub fn blocks_excluded(&self) -> usize {
        self.counts
            .iter()
            .filter(|(k, _)| !k.is_profile_level())
            .map(|(_, n)| n)
            .sum()
    }

    /// Whether nothing was excluded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.values().all(|&n| n == 0)
    }
}

/// Run all seven passes in their conventional order
pub fn apply_exclusions(
    profiles: &mut ProfileSet,
    facts: &SourceFacts,
    sink: &mut dyn ExclusionSink,
) -> ExclusionSummary {
    apply_passes(&ExclusionKind::ALL, profiles, facts, sink)
}

/// Run the given passes in the given order
pub fn apply_passes(
    kinds: &[ExclusionKind],
    profiles: &mut ProfileSet,
    facts: &SourceFacts,
    sink: &mut dyn ExclusionSink,
) -> ExclusionSummary {
    let mut summary = ExclusionSummary::new();
    for &kind in kinds {
        let newly = run_pass(kind, profiles, facts, sink);
        tracing::debug!(pass = %kind, newly_excluded = newly, "exclusion pass finished");
        summary.add(kind, newly);
    }
    summary
}
