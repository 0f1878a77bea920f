//! Completeness Checker
//!
//! Read-only pass run after every exclusion pass has finished. Every
//! unexecuted, non-excluded block in a complete unit is a violation. All
//! violations are collected before failing so one run shows every gap.

use crate::coverage::ProfileSet;
use crate::facts::SourceFacts;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// An untested block in a complete unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// File containing the block
    pub file: String,
    /// First line of the block
    pub start_line: u32,
    /// Last line of the block
    pub end_line: u32,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Untested code in {}:{}-{}",
            self.file, self.start_line, self.end_line
        )
    }
}

/// Required statements were never executed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Untested code in {} places", .violations.len())]
pub struct CompletenessError {
    violations: Vec<Violation>,
}

impl CompletenessError {
    /// Wrap a non-empty violation list
    #[must_use]
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Every violation, in profile then block order
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Number of violations
    #[must_use]
    pub fn count(&self) -> usize {
        self.violations.len()
    }

    /// One line per violation
    #[must_use]
    pub fn report(&self) -> String {
        self.violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Collect violations without failing
#[must_use]
pub fn find_violations(profiles: &ProfileSet, facts: &SourceFacts) -> Vec<Violation> {
    let mut violations = Vec::new();
    for profile in profiles.iter().filter(|p| !p.is_excluded()) {
        if !facts.is_complete_unit(&profile.unit()) {
            continue;
        }
        violations.extend(
            profile
                .active_blocks()
                .filter(|b| b.is_unexecuted())
                .map(|b| Violation {
                    file: profile.file_name.clone(),
                    start_line: b.start_line,
                    end_line: b.end_line,
                }),
        );
    }
    violations
}

/// Fail if any complete unit has untested, non-excluded code
pub fn check_complete(profiles: &ProfileSet, facts: &SourceFacts) -> Result<(), CompletenessError> {
    let violations = find_violations(profiles, facts);
    if violations.is_empty() {
        return Ok(());
    }
    tracing::warn!(count = violations.len(), "untested code in complete units");
    Err(CompletenessError::new(violations))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::coverage::{Mode, Profile, ProfileBlock};

    fn set_with(file: &str, blocks: Vec<ProfileBlock>) -> ProfileSet {
        let mut set = ProfileSet::new();
        let mut profile = Profile::new(file, Mode::Set);
        profile.blocks = blocks;
        set.insert(profile);
        set
    }

    #[test]
    fn test_single_violation_names_file_and_range() {
        let set = set_with("a/b/c.go", vec![ProfileBlock::new(10, 2, 12, 3, 2, 0)]);
        let facts = SourceFacts::new().with_complete_unit("a/b");

        let err = check_complete(&set, &facts).unwrap_err();

        assert_eq!(err.count(), 1);
        assert_eq!(err.to_string(), "Untested code in 1 places");
        assert_eq!(err.report(), "Untested code in a/b/c.go:10-12");
    }

    #[test]
    fn test_incomplete_units_are_not_checked() {
        let set = set_with("a/b/c.go", vec![ProfileBlock::new(10, 2, 12, 3, 2, 0)]);
        let facts = SourceFacts::new().with_complete_unit("a");
        assert!(check_complete(&set, &facts).is_ok());
    }

    #[test]
    fn test_executed_and_excluded_blocks_pass() {
        let mut set = set_with(
            "a/b/c.go",
            vec![
                ProfileBlock::new(1, 1, 2, 1, 1, 4),
                ProfileBlock::new(3, 1, 4, 1, 1, 0),
            ],
        );
        let _ = set.get_mut("a/b/c.go").unwrap().blocks[1].exclude_if_unexecuted();
        let facts = SourceFacts::new().with_complete_unit("a/b");
        assert!(check_complete(&set, &facts).is_ok());
    }

    #[test]
    fn test_excluded_profile_is_skipped() {
        let mut set = set_with("a/b/c.go", vec![ProfileBlock::new(1, 1, 2, 1, 1, 0)]);
        let _ = set.get_mut("a/b/c.go").unwrap().exclude();
        let facts = SourceFacts::new().with_complete_unit("a/b");
        assert!(find_violations(&set, &facts).is_empty());
    }

    #[test]
    fn test_all_violations_are_collected() {
        let mut set = set_with(
            "a/x.go",
            vec![
                ProfileBlock::new(1, 1, 2, 1, 1, 0),
                ProfileBlock::new(3, 1, 4, 1, 1, 1),
                ProfileBlock::new(5, 1, 6, 1, 1, 0),
            ],
        );
        set.insert(Profile::new("a/y.go", Mode::Set).with_block(ProfileBlock::new(7, 1, 8, 1, 1, 0)));
        let facts = SourceFacts::new().with_complete_unit("a");

        let err = check_complete(&set, &facts).unwrap_err();

        assert_eq!(err.count(), 3);
        let lines: Vec<_> = err.violations().iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "Untested code in a/x.go:1-2",
                "Untested code in a/x.go:5-6",
                "Untested code in a/y.go:7-8",
            ]
        );
    }

    #[test]
    fn test_root_unit() {
        let set = set_with("main.go", vec![ProfileBlock::new(1, 1, 2, 1, 1, 0)]);
        let facts = SourceFacts::new().with_complete_unit("");
        assert_eq!(find_violations(&set, &facts).len(), 1);
    }
}
