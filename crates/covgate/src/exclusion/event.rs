//! Exclusion audit records

use serde::{Deserialize, Serialize};
use std::fmt;

/// The seven exclusion passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionKind {
    /// Whole profiles in an excluded unit
    Unit,
    /// Whole profiles named in the excluded file list
    File,
    /// Blocks containing an error-wrapping call
    Wrap,
    /// Blocks containing a panic call
    Panic,
    /// Blocks under an explicit block annotation
    Block,
    /// Blocks overlapping an annotated function
    Func,
    /// Blocks containing a skipped identifier
    Skip,
}

impl ExclusionKind {
    /// All passes in their conventional run order
    pub const ALL: [Self; 7] = [
        Self::Unit,
        Self::File,
        Self::Wrap,
        Self::Panic,
        Self::Block,
        Self::Func,
        Self::Skip,
    ];

    /// Short lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::File => "file",
            Self::Wrap => "wrap",
            Self::Panic => "panic",
            Self::Block => "block",
            Self::Func => "func",
            Self::Skip => "skip",
        }
    }

    /// Whether the pass excludes whole profiles rather than blocks
    #[must_use]
    pub const fn is_profile_level(self) -> bool {
        matches!(self, Self::Unit | Self::File)
    }
}

impl fmt::Display for ExclusionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One exclusion decision, emitted for every match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionEvent {
    /// A profile was exempted because its unit is excluded
    Unit {
        /// Excluded unit
        unit: String,
        /// Profile file name
        file: String,
    },
    /// A profile was exempted by file name
    File {
        /// Profile file name
        file: String,
    },
    /// A block containing an error-wrapping call was exempted
    Wrap {
        /// Call-site identifier
        id: String,
        /// File of the call
        file: String,
        /// Line of the call
        line: u32,
    },
    /// A block containing a panic call was exempted
    Panic {
        /// Call-site identifier
        id: String,
        /// File of the call
        file: String,
        /// Line of the call
        line: u32,
    },
    /// A block under an explicit annotation was exempted
    Block {
        /// Annotated file
        file: String,
        /// Coverage (1-based) line the annotation applies to
        line: u32,
    },
    /// A block inside an annotated function was exempted
    Func {
        /// Annotated file
        file: String,
        /// First line of the function
        line_start: u32,
        /// Last line of the function
        line_end: u32,
    },
    /// A block containing a skipped identifier was exempted
    Skip {
        /// Skipped identifier
        id: String,
        /// Resolved file
        file: String,
        /// Resolved line
        line: u32,
    },
}

impl ExclusionEvent {
    /// Pass that produced the event
    #[must_use]
    pub const fn kind(&self) -> ExclusionKind {
        match self {
            Self::Unit { .. } => ExclusionKind::Unit,
            Self::File { .. } => ExclusionKind::File,
            Self::Wrap { .. } => ExclusionKind::Wrap,
            Self::Panic { .. } => ExclusionKind::Panic,
            Self::Block { .. } => ExclusionKind::Block,
            Self::Func { .. } => ExclusionKind::Func,
            Self::Skip { .. } => ExclusionKind::Skip,
        }
    }

    /// File the event concerns
    #[must_use]
    pub fn file(&self) -> &str {
        match self {
            Self::Unit { file, .. }
            | Self::File { file }
            | Self::Wrap { file, .. }
            | Self::Panic { file, .. }
            | Self::Block { file, .. }
            | Self::Func { file, .. }
            | Self::Skip { file, .. } => file,
        }
    }
}

impl fmt::Display for ExclusionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit { unit, file } => write!(f, "Excluding unit {unit} - {file}"),
            Self::File { file } => write!(f, "Excluding file {file}"),
            Self::Wrap { id, file, line } => write!(f, "Excluding wrap {id} from {file}:{line}"),
            Self::Panic { id, file, line } if id.is_empty() => {
                write!(f, "Excluding panic from {file}:{line}")
            }
            Self::Panic { id, file, line } => write!(f, "Excluding panic {id} from {file}:{line}"),
            Self::Block { file, line } => write!(f, "Excluding block from {file}:{line}"),
            Self::Func {
                file,
                line_start,
                line_end,
            } => write!(f, "Excluding func from {file}:{line_start}-{line_end}"),
            Self::Skip { id, file, line } => {
                write!(f, "Excluding skipped id {id} from {file}:{line}")
            }
        }
    }
}
