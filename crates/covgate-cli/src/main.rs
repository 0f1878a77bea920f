//! Covgate CLI: coverage-policy gate
//!
//! ## Usage
//!
//! ```bash
//! covgate check                         # ./coverage.raw + ./covgate-facts.json
//! covgate check pkg --audit audit.json  # keep every exclusion event
//! covgate inspect -p coverage.raw       # per-file statement totals
//! ```

use clap::Parser;
use covgate_cli::{
    handlers::{execute_check, execute_inspect},
    logging::init_tracing,
    Cli, CliConfig, CliResult, ColorChoice, Commands, LogFormat, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli);
    let _ = init_tracing(&config);

    match cli.command {
        Commands::Check(args) => execute_check(&config, &args).map(|_| ()),
        Commands::Inspect(args) => execute_inspect(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);
    let color: ColorChoice = cli.color.clone().into();
    let log_format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };

    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_log_format(log_format)
}
