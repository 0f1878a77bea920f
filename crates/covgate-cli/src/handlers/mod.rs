//! Command handlers - extracted from main.rs for testability
//!
//! Each handler module contains:
//! - The execution logic for a CLI command
//! - Pure helper functions
//! - Tests against temporary directories

pub mod check;
pub mod inspect;

pub use check::{execute_check, fact_warnings, load_facts, load_profiles, write_audit};
pub use inspect::{execute_inspect, inspect_lines};
