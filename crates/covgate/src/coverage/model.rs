//! Mutable Coverage Model
//!
//! Profiles and blocks carry an `excluded` flag that only ever moves from
//! `false` to `true`. The flag is private so the monotonic rule and the
//! "never exclude executed code" rule are enforced here rather than in every
//! pass.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Semantics of the hit counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Executed or not (0/1)
    #[default]
    Set,
    /// Exact execution count
    Count,
    /// Exact execution count, collected with atomic counters
    Atomic,
}

impl Mode {
    /// Tag used in the coverage text format
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Count => "count",
            Self::Atomic => "atomic",
        }
    }

    /// Combine the hit counts of two records describing the same range
    #[must_use]
    pub const fn merge_hits(self, a: u64, b: u64) -> u64 {
        match self {
            Self::Set => {
                if a != 0 || b != 0 {
                    1
                } else {
                    0
                }
            }
            Self::Count | Self::Atomic => a.saturating_add(b),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a mode tag is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown coverage mode '{}'", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set" => Ok(Self::Set),
            "count" => Ok(Self::Count),
            "atomic" => Ok(Self::Atomic),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// One measured statement range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileBlock {
    /// First line of the range (1-based)
    pub start_line: u32,
    /// First column of the range (1-based)
    pub start_col: u32,
    /// Last line of the range (1-based)
    pub end_line: u32,
    /// Last column of the range (1-based)
    pub end_col: u32,
    /// Number of statements in the range
    pub num_statements: u32,
    /// Times the range was executed during the test run
    pub hit_count: u64,
    excluded: bool,
}

impl ProfileBlock {
    /// Create a block with the exclusion flag cleared
    #[must_use]
    pub const fn new(
        start_line: u32,
        start_col: u32,
        end_line: u32,
        end_col: u32,
        num_statements: u32,
        hit_count: u64,
    ) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
            num_statements,
            hit_count,
            excluded: false,
        }
    }

    /// Whether the block was never executed
    #[must_use]
    pub const fn is_unexecuted(&self) -> bool {
        self.hit_count == 0
    }

    /// Whether `line` falls within `[start_line, end_line]`
    #[must_use]
    pub const fn contains_line(&self, line: u32) -> bool {
        self.start_line <= line && self.end_line >= line
    }

    /// Whether the block overlaps the inclusive span `[first, last]`
    #[must_use]
    pub const fn overlaps(&self, first: u32, last: u32) -> bool {
        self.start_line <= last && self.end_line >= first
    }

    /// Whether an exclusion pass has exempted this block
    #[must_use]
    pub const fn is_excluded(&self) -> bool {
        self.excluded
    }

    /// Exempt the block if it was never executed.
    ///
    /// Returns `true` when the block is excluded after the call, so callers
    /// can report the match. Executed blocks are left untouched.
    pub fn exclude_if_unexecuted(&mut self) -> bool {
        if !self.is_unexecuted() {
            return false;
        }
        self.excluded = true;
        true
    }
}

/// Coverage data for one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Package- or module-relative path, unique within a [`ProfileSet`]
    pub file_name: String,
    /// Counter semantics inherited from the input
    pub mode: Mode,
    /// Blocks in the order the measurement tool emitted them
    pub blocks: Vec<ProfileBlock>,
    excluded: bool,
}

impl Profile {
    /// Create an empty, non-excluded profile
    #[must_use]
    pub fn new(file_name: impl Into<String>, mode: Mode) -> Self {
        Self {
            file_name: file_name.into(),
            mode,
            blocks: Vec::new(),
            excluded: false,
        }
    }

    /// Append a block (builder style)
    #[must_use]
    pub fn with_block(mut self, block: ProfileBlock) -> Self {
        self.blocks.push(block);
        self
    }

    /// Unit (slash-separated directory) the file belongs to
    #[must_use]
    pub fn unit(&self) -> String {
        unit_of(&self.file_name)
    }

    /// Whether the whole profile is exempt
    #[must_use]
    pub const fn is_excluded(&self) -> bool {
        self.excluded
    }

    /// Exempt the whole profile. Returns `true` if this call changed the flag.
    pub fn exclude(&mut self) -> bool {
        let changed = !self.excluded;
        self.excluded = true;
        changed
    }

    /// Blocks that still count towards coverage
    pub fn active_blocks(&self) -> impl Iterator<Item = &ProfileBlock> {
        let skip_all = self.excluded;
        self.blocks
            .iter()
            .filter(move |b| !skip_all && !b.is_excluded())
    }
}

/// Derive the unit identifier of a file name.
///
/// The unit is the directory part of the path with backslashes normalised to
/// `/` and no trailing separator. A bare file name belongs to the empty unit.
#[must_use]
pub fn unit_of(file_name: &str) -> String {
    let normalized = file_name.replace('\\', "/");
    match normalized.rfind('/') {
        Some(idx) => normalized[..idx].trim_end_matches('/').to_string(),
        None => String::new(),
    }
}

/// Profiles keyed by file name, iterated in import order
#[derive(Debug, Clone, Default)]
pub struct ProfileSet {
    profiles: Vec<Profile>,
    index: HashMap<String, usize>,
}

impl ProfileSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a profile.
    ///
    /// A second profile for a file already present has its blocks appended to
    /// the existing entry, keeping file names unique. The first mode wins; a
    /// differing mode is logged at `warn`.
    pub fn insert(&mut self, profile: Profile) {
        if let Some(&idx) = self.index.get(&profile.file_name) {
            let existing = &mut self.profiles[idx];
            if existing.mode != profile.mode {
                tracing::warn!(
                    file = %profile.file_name,
                    kept = %existing.mode,
                    dropped = %profile.mode,
                    "duplicate profile with a different mode"
                );
            }
            existing.blocks.extend(profile.blocks);
            return;
        }
        let _ = self
            .index
            .insert(profile.file_name.clone(), self.profiles.len());
        self.profiles.push(profile);
    }

    /// Look up a profile by file name
    #[must_use]
    pub fn get(&self, file_name: &str) -> Option<&Profile> {
        self.index.get(file_name).map(|&idx| &self.profiles[idx])
    }

    /// Look up a profile by file name for flag updates
    pub fn get_mut(&mut self, file_name: &str) -> Option<&mut Profile> {
        match self.index.get(file_name) {
            Some(&idx) => self.profiles.get_mut(idx),
            None => None,
        }
    }

    /// Iterate profiles in import order
    pub fn iter(&self) -> std::slice::Iter<'_, Profile> {
        self.profiles.iter()
    }

    /// Iterate profiles mutably in import order
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Profile> {
        self.profiles.iter_mut()
    }

    /// Number of profiles
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the set holds no profiles
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl<'a> IntoIterator for &'a ProfileSet {
    type Item = &'a Profile;
    type IntoIter = std::slice::Iter<'a, Profile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
