//! Result and error types for Covgate.
//!
//! Collaborator failures (unreadable input, malformed profiles, bad facts
//! files) are `CovgateError`. Untested code in complete units is reported
//! separately through [`crate::check::CompletenessError`].

use crate::coverage::Mode;
use thiserror::Error;

/// Result type for Covgate operations
pub type CovgateResult<T> = Result<T, CovgateError>;

/// Errors that can occur while loading or writing coverage data
#[derive(Debug, Error)]
pub enum CovgateError {
    /// Malformed coverage profile line
    #[error("Profile parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number in the profile text
        line: usize,
        /// Error message
        message: String,
    },

    /// Concatenated profiles disagree on the counter mode
    #[error("Profile mode mismatch at line {line}: expected {expected}, found {found}")]
    ModeMismatch {
        /// 1-based line number of the conflicting header
        line: usize,
        /// Mode from the first header
        expected: Mode,
        /// Mode from the conflicting header
        found: Mode,
    },

    /// Profiles to be written in one artifact disagree on the counter mode
    #[error("Profile mode mismatch for {file}: expected {expected}, found {found}")]
    MixedModes {
        /// File whose mode differs from the header
        file: String,
        /// Mode of the first profile
        expected: Mode,
        /// Mode of `file`
        found: Mode,
    },

    /// Facts file could not be interpreted
    #[error("Invalid facts: {message}")]
    InvalidFacts {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl CovgateError {
    /// Create a parse error for the given 1-based line
    #[must_use]
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid facts error
    #[must_use]
    pub fn invalid_facts(message: impl Into<String>) -> Self {
        Self::InvalidFacts {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_line() {
        let err = CovgateError::parse(7, "missing block range");
        let text = err.to_string();
        assert!(text.contains("line 7"));
        assert!(text.contains("missing block range"));
    }

    #[test]
    fn test_mode_mismatch_display() {
        let err = CovgateError::ModeMismatch {
            line: 3,
            expected: Mode::Set,
            found: Mode::Count,
        };
        assert_eq!(
            err.to_string(),
            "Profile mode mismatch at line 3: expected set, found count"
        );
    }

    #[test]
    fn test_mixed_modes_display() {
        let err = CovgateError::MixedModes {
            file: "b.go".to_string(),
            expected: Mode::Set,
            found: Mode::Count,
        };
        assert_eq!(
            err.to_string(),
            "Profile mode mismatch for b.go: expected set, found count"
        );
    }

    #[test]
    fn test_invalid_facts_error() {
        let err = CovgateError::invalid_facts("unknown extension");
        assert!(err.to_string().contains("Invalid facts"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CovgateError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }

    #[test]
    fn test_json_error_from() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: CovgateError = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
