//! Inspect command handler

use super::check::load_profiles;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::InspectArgs;
use covgate::{CoverageStats, RawProfile};

/// Execute the inspect command
pub fn execute_inspect(_config: &CliConfig, args: &InspectArgs) -> CliResult<()> {
    let profiles = load_profiles(&args.profile)?;
    for line in inspect_lines(&profiles, args.uncovered) {
        println!("{line}");
    }
    let stats = CoverageStats::from_profiles(&profiles);
    println!(
        "total: {}/{} statements ({:.1}%) in {} files",
        stats.covered_statements,
        stats.statements,
        stats.percent(),
        stats.files
    );
    Ok(())
}

/// One `file: covered/total statements` line per profile
#[must_use]
pub fn inspect_lines(profiles: &[RawProfile], uncovered_only: bool) -> Vec<String> {
    profiles
        .iter()
        .filter(|p| !uncovered_only || p.covered_statements() < p.total_statements())
        .map(|p| {
            format!(
                "{}: {}/{} statements",
                p.file_name,
                p.covered_statements(),
                p.total_statements()
            )
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use covgate::parse_profiles;

    const SAMPLE: &str = "mode: count\na/x.go:1.1,2.2 2 3\na/x.go:3.1,4.2 1 0\na/y.go:1.1,9.2 4 1\n";

    #[test]
    fn test_inspect_lines_lists_every_file() {
        let profiles = parse_profiles(SAMPLE).unwrap();
        assert_eq!(
            inspect_lines(&profiles, false),
            vec!["a/x.go: 2/3 statements", "a/y.go: 4/4 statements"]
        );
    }

    #[test]
    fn test_inspect_lines_uncovered_only() {
        let profiles = parse_profiles(SAMPLE).unwrap();
        assert_eq!(inspect_lines(&profiles, true), vec!["a/x.go: 2/3 statements"]);
    }

    #[test]
    fn test_execute_inspect_missing_profile() {
        let args = InspectArgs {
            profile: "/nonexistent/coverage.raw".into(),
            uncovered: false,
        };
        assert!(execute_inspect(&CliConfig::new(), &args).is_err());
    }
}
