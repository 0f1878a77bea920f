//! Covgate: Coverage-Policy Gate
//!
//! Takes statement coverage measured by a test run plus facts extracted from
//! the source tree, exempts the statements the facts allow, and fails if any
//! remaining statement in a complete unit was never executed.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    COVGATE Pipeline                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌──────────┐   ┌───────────┐   ┌───────────┐   ┌──────────┐   │
//! │   │ Importer │──►│ Exclusion │──►│ Complete- │──►│ Exporter │   │
//! │   │          │   │ (7 passes)│   │ ness check│   │          │   │
//! │   └──────────┘   └───────────┘   └───────────┘   └──────────┘   │
//! │        ▲               ▲                                         │
//! │   RawProfile      SourceFacts                                    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use covgate::{parse_profiles, Gate, NullSink, SourceFacts};
//!
//! let raw = parse_profiles("mode: set\na/b/c.go:10.2,12.3 1 0\n").unwrap();
//! let facts = SourceFacts::new()
//!     .with_complete_unit("a/b")
//!     .with_wrap_site("a/b/c.go", 11, "QWERTYUIOP");
//!
//! let report = Gate::new(&facts).run(&raw, &mut NullSink).unwrap();
//! assert!(report.profiles[0].blocks.is_empty());
//! ```

#![warn(missing_docs)]

pub mod check;
pub mod coverage;
pub mod exclusion;
pub mod facts;
pub mod gate;
mod result;

pub use check::{check_complete, find_violations, CompletenessError, Violation};
pub use coverage::{
    export_profiles, import_profiles, parse_profiles, read_profiles, render_profiles, unit_of,
    write_profiles, CoverageStats, Mode, Profile, ProfileBlock, ProfileSet, RawBlock, RawProfile,
};
pub use exclusion::{
    apply_exclusions, apply_passes, ExclusionEvent, ExclusionKind, ExclusionSink,
    ExclusionSummary, NullSink, RecordingSink, TracingSink,
};
pub use facts::{BlockAnnotation, CallSite, FactLocation, FuncAnnotation, SourceFacts};
pub use gate::{Gate, GateReport};
pub use result::{CovgateError, CovgateResult};

/// Commonly used items
pub mod prelude {
    pub use super::check::*;
    pub use super::coverage::{CoverageStats, Mode, Profile, ProfileBlock, ProfileSet, RawBlock, RawProfile};
    pub use super::exclusion::{ExclusionEvent, ExclusionKind, ExclusionSink, RecordingSink};
    pub use super::facts::SourceFacts;
    pub use super::gate::{Gate, GateReport};
    pub use super::result::{CovgateError, CovgateResult};
}
