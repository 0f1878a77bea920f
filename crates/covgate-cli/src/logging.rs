//! Tracing subscriber setup

use crate::config::{CliConfig, LogFormat};
use std::io;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
#[must_use]
pub fn default_filter(config: &CliConfig) -> EnvFilter {
    EnvFilter::new(config.verbosity.log_directive())
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the `-v`/`-q` flags. Returns `false` if a subscriber
/// was already installed.
pub fn init_tracing(config: &CliConfig) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);

    let installed = match config.log_format {
        LogFormat::Text => builder.with_ansi(config.color.should_color()).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Verbosity;

    #[test]
    fn test_default_filter_follows_verbosity() {
        let config = CliConfig::new().with_verbosity(Verbosity::Debug);
        assert!(default_filter(&config).to_string().contains("debug"));

        let config = CliConfig::new().with_verbosity(Verbosity::Quiet);
        assert!(default_filter(&config).to_string().contains("error"));
    }

    #[test]
    fn test_second_init_is_rejected() {
        let config = CliConfig::new();
        let _ = init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
