//! Check command handler

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{ConsoleSink, Reporter};
use crate::CheckArgs;
use covgate::{
    read_profiles, write_profiles, CovgateError, ExclusionEvent, Gate, GateReport, RawProfile,
    SourceFacts,
};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// Execute the check command
pub fn execute_check(config: &CliConfig, args: &CheckArgs) -> CliResult<GateReport> {
    let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());

    let profile_path = args.profile_path();
    let output = args.output_path();
    if output == profile_path {
        return Err(CliError::invalid_argument(format!(
            "output {} would overwrite the raw profile",
            output.display()
        )));
    }

    let facts = load_facts(&args.facts_path())?;
    let raw = load_profiles(&profile_path)?;
    tracing::info!(
        files = raw.len(),
        complete_units = facts.complete_units.len(),
        "inputs loaded"
    );

    if config.verbosity.is_debug() {
        for warning in fact_warnings(&facts, &raw) {
            reporter.warning(&warning);
        }
    }

    let mut sink = ConsoleSink::new(&reporter);
    if args.audit.is_some() {
        sink = sink.with_audit();
    }
    let outcome = Gate::new(&facts).run(&raw, &mut sink);

    if let (Some(path), Some(events)) = (args.audit.as_deref(), sink.into_audit()) {
        write_audit(path, &events)?;
        tracing::info!(path = %path.display(), events = events.len(), "audit written");
    }

    let report = match outcome {
        Ok(report) => report,
        Err(err) => {
            reporter.violations(&err);
            return Err(err.into());
        }
    };

    write_profiles(&output, &report.profiles)?;

    if config.verbosity.is_verbose() && !report.summary.is_empty() {
        reporter.header("Exclusions");
        reporter.exclusions(&report.summary);
    }
    reporter.success(&format!("Wrote {}", output.display()));
    reporter.summary(&report.stats);
    Ok(report)
}

/// Facts that cannot affect the run: skipped ids without a location and
/// facts naming files absent from the profile
#[must_use]
pub fn fact_warnings(facts: &SourceFacts, raw: &[RawProfile]) -> Vec<String> {
    let known: HashSet<&str> = raw.iter().map(|p| p.file_name.as_str()).collect();
    let mut warnings = Vec::new();

    let mut files: BTreeSet<&str> = BTreeSet::new();
    for id in &facts.skipped_ids {
        match facts.resolve(id) {
            Some(location) => {
                let _ = files.insert(location.file.as_str());
            }
            None => warnings.push(format!("skipped id {id} has no known location")),
        }
    }
    files.extend(facts.excluded_files.iter().map(String::as_str));
    files.extend(facts.wrap_sites.iter().map(|s| s.file.as_str()));
    files.extend(facts.panic_sites.iter().map(|s| s.file.as_str()));
    files.extend(facts.explicit_blocks.iter().map(|b| b.file.as_str()));
    files.extend(facts.explicit_funcs.iter().map(|f| f.file.as_str()));

    warnings.extend(
        files
            .into_iter()
            .filter(|file| !known.contains(file))
            .map(|file| format!("no coverage profile for {file}")),
    );
    warnings
}

/// Load the facts file, naming the path when it is missing
pub fn load_facts(path: &Path) -> CliResult<SourceFacts> {
    if !path.exists() {
        return Err(CliError::config(format!(
            "facts file not found: {}",
            path.display()
        )));
    }
    Ok(SourceFacts::load(path)?)
}

/// Read the raw profile, naming the path when it is missing
pub fn load_profiles(path: &Path) -> CliResult<Vec<RawProfile>> {
    if !path.exists() {
        return Err(CliError::config(format!(
            "coverage profile not found: {}",
            path.display()
        )));
    }
    Ok(read_profiles(path)?)
}

/// Write exclusion events as pretty JSON
pub fn write_audit(path: &Path, events: &[ExclusionEvent]) -> CliResult<()> {
    let json = serde_json::to_string_pretty(events).map_err(CovgateError::from)?;
    std::fs::write(path, json)?;
    Ok(())
}
