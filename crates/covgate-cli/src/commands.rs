//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// Default raw profile name under the root directory
pub const DEFAULT_PROFILE: &str = "coverage.raw";
/// Default facts file name under the root directory
pub const DEFAULT_FACTS: &str = "covgate-facts.json";
/// Default filtered artifact name under the root directory
pub const DEFAULT_OUTPUT: &str = "coverage.out";

/// Covgate: fail the build when complete units contain untested code
#[derive(Parser, Debug)]
#[command(name = "covgate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress exclusion lines and the summary)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Emit log events as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply exclusion facts to a coverage profile and check complete units
    Check(CheckArgs),

    /// Print per-file statement totals of a coverage profile
    Inspect(InspectArgs),
}

/// Arguments for the check command
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Root directory of the scanned tree
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Raw coverage profile [default: <ROOT>/coverage.raw]
    #[arg(short, long, env = "COVGATE_PROFILE")]
    pub profile: Option<PathBuf>,

    /// Source facts file, JSON or YAML [default: <ROOT>/covgate-facts.json]
    #[arg(short, long, env = "COVGATE_FACTS")]
    pub facts: Option<PathBuf>,

    /// Filtered profile to write [default: <ROOT>/coverage.out]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write every exclusion event to this file as JSON
    #[arg(long)]
    pub audit: Option<PathBuf>,
}

impl CheckArgs {
    /// Raw profile to read
    #[must_use]
    pub fn profile_path(&self) -> PathBuf {
        resolve(&self.root, self.profile.as_deref(), DEFAULT_PROFILE)
    }

    /// Facts file to read
    #[must_use]
    pub fn facts_path(&self) -> PathBuf {
        resolve(&self.root, self.facts.as_deref(), DEFAULT_FACTS)
    }

    /// Artifact to write
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        resolve(&self.root, self.output.as_deref(), DEFAULT_OUTPUT)
    }
}

/// Arguments for the inspect command
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Coverage profile to inspect
    #[arg(short, long, default_value = DEFAULT_PROFILE)]
    pub profile: PathBuf,

    /// Only list files with unexecuted statements
    #[arg(long)]
    pub uncovered: bool,
}

fn resolve(root: &Path, explicit: Option<&Path>, default_name: &str) -> PathBuf {
    explicit.map_or_else(|| root.join(default_name), Path::to_path_buf)
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
