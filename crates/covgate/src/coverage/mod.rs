//! Statement Coverage Model
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  COVGATE COVERAGE DATA FLOW                                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  coverage.raw → parse → RawProfile → import → ProfileSet        │
//! │                                                  ↓               │
//! │  coverage.out ← render ← RawProfile ← export ← (flags set)      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod format;
mod model;
mod raw;

pub use format::{parse_profiles, read_profiles, render_profiles, write_profiles};
pub use model::{unit_of, Mode, Profile, ProfileBlock, ProfileSet, UnknownMode};
pub use raw::{export_profiles, import_profiles, CoverageStats, RawBlock, RawProfile};
