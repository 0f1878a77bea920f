//! Raw Measurement Records and Import/Export
//!
//! `RawProfile` mirrors what the measurement tool emits. The importer turns a
//! collection of them into a [`ProfileSet`]; the exporter turns the surviving
//! part of a `ProfileSet` back into raw records.

use super::model::{Mode, Profile, ProfileBlock, ProfileSet};
use serde::{Deserialize, Serialize};

/// One measured block as emitted by the measurement tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawBlock {
    /// First line (1-based)
    pub start_line: u32,
    /// First column (1-based)
    pub start_col: u32,
    /// Last line (1-based)
    pub end_line: u32,
    /// Last column (1-based)
    pub end_col: u32,
    /// Statements in the range
    pub num_statements: u32,
    /// Execution count
    pub hit_count: u64,
}

impl RawBlock {
    /// Whether two records describe the same source range
    #[must_use]
    pub const fn same_range(&self, other: &Self) -> bool {
        self.start_line == other.start_line
            && self.start_col == other.start_col
            && self.end_line == other.end_line
            && self.end_col == other.end_col
    }
}

/// Per-file measurement entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProfile {
    /// File identifier
    pub file_name: String,
    /// Counter mode tag, preserved verbatim
    pub mode: Mode,
    /// Blocks in emission order
    pub blocks: Vec<RawBlock>,
}

impl RawProfile {
    /// Create an empty raw profile
    #[must_use]
    pub fn new(file_name: impl Into<String>, mode: Mode) -> Self {
        Self {
            file_name: file_name.into(),
            mode,
            blocks: Vec::new(),
        }
    }

    /// Total statements across all blocks
    #[must_use]
    pub fn total_statements(&self) -> u64 {
        self.blocks.iter().map(|b| u64::from(b.num_statements)).sum()
    }

    /// Statements in blocks that were executed at least once
    #[must_use]
    pub fn covered_statements(&self) -> u64 {
        self.blocks
            .iter()
            .filter(|b| b.hit_count > 0)
            .map(|b| u64::from(b.num_statements))
            .sum()
    }
}

impl From<&RawBlock> for ProfileBlock {
    fn from(b: &RawBlock) -> Self {
        Self::new(
            b.start_line,
            b.start_col,
            b.end_line,
            b.end_col,
            b.num_statements,
            b.hit_count,
        )
    }
}

impl From<&ProfileBlock> for RawBlock {
    fn from(b: &ProfileBlock) -> Self {
        Self {
            start_line: b.start_line,
            start_col: b.start_col,
            end_line: b.end_line,
            end_col: b.end_col,
            num_statements: b.num_statements,
            hit_count: b.hit_count,
        }
    }
}

/// Build the mutable model from raw measurements.
///
/// Field values are copied unchanged and every exclusion flag starts cleared.
#[must_use]
pub fn import_profiles(raw: &[RawProfile]) -> ProfileSet {
    let mut set = ProfileSet::new();
    for entry in raw {
        let mut profile = Profile::new(entry.file_name.clone(), entry.mode);
        profile.blocks = entry.blocks.iter().map(ProfileBlock::from).collect();
        set.insert(profile);
    }
    set
}

/// Produce raw records for everything that survived exclusion.
///
/// Excluded profiles are dropped entirely; within a kept profile only
/// non-excluded blocks are emitted, in their original order.
#[must_use]
pub fn export_profiles(profiles: &ProfileSet) -> Vec<RawProfile> {
    profiles
        .iter()
        .filter(|p| !p.is_excluded())
        .map(|p| RawProfile {
            file_name: p.file_name.clone(),
            mode: p.mode,
            blocks: p.active_blocks().map(RawBlock::from).collect(),
        })
        .collect()
}

/// Statement totals over a collection of raw profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoverageStats {
    /// Number of files
    pub files: usize,
    /// Number of blocks
    pub blocks: usize,
    /// Total statements
    pub statements: u64,
    /// Statements executed at least once
    pub covered_statements: u64,
}

impl CoverageStats {
    /// Compute totals over `profiles`
    #[must_use]
    pub fn from_profiles(profiles: &[RawProfile]) -> Self {
        profiles.iter().fold(Self::default(), |acc, p| Self {
            files: acc.files + 1,
            blocks: acc.blocks + p.blocks.len(),
            statements: acc.statements + p.total_statements(),
            covered_statements: acc.covered_statements + p.covered_statements(),
        })
    }

    /// Covered statements as a percentage (100 when there is nothing to cover)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f64 {
        if self.statements == 0 {
            return 100.0;
        }
        self.covered_statements as f64 * 100.0 / self.statements as f64
    }
}
