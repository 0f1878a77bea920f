//! Covgate CLI Library
//!
//! Command-line front end for the coverage gate: loads a raw profile and a
//! facts file, runs the gate, reports exclusions and violations, and writes
//! the filtered profile.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;

pub use commands::{
    CheckArgs, Cli, ColorArg, Commands, InspectArgs, DEFAULT_FACTS, DEFAULT_OUTPUT,
    DEFAULT_PROFILE,
};
pub use config::{CliConfig, ColorChoice, LogFormat, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{ConsoleSink, Reporter};
