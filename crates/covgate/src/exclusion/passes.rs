//! The seven exclusion passes
//!
//! Every pass only sets flags. Block-level passes go through
//! [`ProfileBlock::exclude_if_unexecuted`], so executed code is never exempted
//! and a flag is never cleared. Facts naming a file without a profile are
//! skipped.

use super::{ExclusionEvent, ExclusionKind, ExclusionSink};
use crate::coverage::{Profile, ProfileBlock, ProfileSet};
use crate::facts::{CallSite, SourceFacts};

/// Run a single pass. Returns how many profiles (unit/file passes) or blocks
/// (all other passes) were newly excluded.
pub fn run_pass(
    kind: ExclusionKind,
    profiles: &mut ProfileSet,
    facts: &SourceFacts,
    sink: &mut dyn ExclusionSink,
) -> usize {
    match kind {
        ExclusionKind::Unit => exclude_units(profiles, facts, sink),
        ExclusionKind::File => exclude_files(profiles, facts, sink),
        ExclusionKind::Wrap => exclude_wraps(profiles, facts, sink),
        ExclusionKind::Panic => exclude_panics(profiles, facts, sink),
        ExclusionKind::Block => exclude_blocks(profiles, facts, sink),
        ExclusionKind::Func => exclude_funcs(profiles, facts, sink),
        ExclusionKind::Skip => exclude_skips(profiles, facts, sink),
    }
}

/// Exempt every profile whose unit is listed in `excluded_units`
pub fn exclude_units(
    profiles: &mut ProfileSet,
    facts: &SourceFacts,
    sink: &mut dyn ExclusionSink,
) -> usize {
    let mut newly = 0;
    for profile in profiles.iter_mut() {
        let unit = profile.unit();
        if facts.excluded_units.contains(&unit) {
            if profile.exclude() {
                newly += 1;
            }
            sink.record(ExclusionEvent::Unit {
                unit,
                file: profile.file_name.clone(),
            });
        }
    }
    newly
}

/// Exempt every profile whose file name is listed in `excluded_files`
pub fn exclude_files(
    profiles: &mut ProfileSet,
    facts: &SourceFacts,
    sink: &mut dyn ExclusionSink,
) -> usize {
    let mut newly = 0;
    for profile in profiles.iter_mut() {
        if facts.excluded_files.contains(&profile.file_name) {
            if profile.exclude() {
                newly += 1;
            }
            sink.record(ExclusionEvent::File {
                file: profile.file_name.clone(),
            });
        }
    }
    newly
}

/// Exempt unexecuted blocks containing an error-wrapping call
pub fn exclude_wraps(
    profiles: &mut ProfileSet,
    facts: &SourceFacts,
    sink: &mut dyn ExclusionSink,
) -> usize {
    exclude_call_sites(profiles, &facts.wrap_sites, ExclusionKind::Wrap, sink)
}

/// Exempt unexecuted blocks containing a panic call
pub fn exclude_panics(
    profiles: &mut ProfileSet,
    facts: &SourceFacts,
    sink: &mut dyn ExclusionSink,
) -> usize {
    exclude_call_sites(profiles, &facts.panic_sites, ExclusionKind::Panic, sink)
}

fn exclude_call_sites(
    profiles: &mut ProfileSet,
    sites: &[CallSite],
    kind: ExclusionKind,
    sink: &mut dyn ExclusionSink,
) -> usize {
    let mut newly = 0;
    for site in sites {
        let Some(profile) = lookup(profiles, &site.file, kind) else {
            continue;
        };
        let (matched, added) = exclude_where(profile, |b| b.contains_line(site.line));
        newly += added;
        for _ in 0..matched {
            let event = if kind == ExclusionKind::Wrap {
                ExclusionEvent::Wrap {
                    id: site.id.clone(),
                    file: site.file.clone(),
                    line: site.line,
                }
            } else {
                ExclusionEvent::Panic {
                    id: site.id.clone(),
                    file: site.file.clone(),
                    line: site.line,
                }
            };
            sink.record(event);
        }
    }
    newly
}

/// Exempt unexecuted blocks on the line after an explicit block annotation
pub fn exclude_blocks(
    profiles: &mut ProfileSet,
    facts: &SourceFacts,
    sink: &mut dyn ExclusionSink,
) -> usize {
    let mut newly = 0;
    for annotation in &facts.explicit_blocks {
        let Some(profile) = lookup(profiles, &annotation.file, ExclusionKind::Block) else {
            continue;
        };
        let Some(line) = annotation.target_line() else {
            tracing::debug!(
                file = %annotation.file,
                line = annotation.line,
                "block annotation past the last line"
            );
            continue;
        };
        let (matched, added) = exclude_where(profile, |b| b.contains_line(line));
        newly += added;
        for _ in 0..matched {
            sink.record(ExclusionEvent::Block {
                file: annotation.file.clone(),
                line,
            });
        }
    }
    newly
}

/// Exempt unexecuted blocks overlapping an annotated function
pub fn exclude_funcs(
    profiles: &mut ProfileSet,
    facts: &SourceFacts,
    sink: &mut dyn ExclusionSink,
) -> usize {
    let mut newly = 0;
    for func in &facts.explicit_funcs {
        let Some(profile) = lookup(profiles, &func.file, ExclusionKind::Func) else {
            continue;
        };
        let (matched, added) =
            exclude_where(profile, |b| b.overlaps(func.line_start, func.line_end));
        newly += added;
        for _ in 0..matched {
            sink.record(ExclusionEvent::Func {
                file: func.file.clone(),
                line_start: func.line_start,
                line_end: func.line_end,
            });
        }
    }
    newly
}

/// Exempt unexecuted blocks containing a skipped identifier.
///
/// Identifiers without a known location are ignored.
pub fn exclude_skips(
    profiles: &mut ProfileSet,
    facts: &SourceFacts,
    sink: &mut dyn ExclusionSink,
) -> usize {
    let mut newly = 0;
    for id in &facts.skipped_ids {
        let Some(location) = facts.resolve(id) else {
            tracing::debug!(id = %id, "skipped id has no known location");
            continue;
        };
        let Some(profile) = lookup(profiles, &location.file, ExclusionKind::Skip) else {
            continue;
        };
        let (matched, added) = exclude_where(profile, |b| b.contains_line(location.line));
        newly += added;
        for _ in 0..matched {
            sink.record(ExclusionEvent::Skip {
                id: id.clone(),
                file: location.file.clone(),
                line: location.line,
            });
        }
    }
    newly
}

fn lookup<'a>(profiles: &'a mut ProfileSet, file: &str, kind: ExclusionKind) -> Option<&'a mut Profile> {
    let found = profiles.get_mut(file);
    if found.is_none() {
        tracing::debug!(file, %kind, "no coverage profile for fact");
    }
    found
}

/// Exclude unexecuted blocks selected by `select`.
///
/// Returns `(matched, newly_excluded)`: blocks that matched and are now
/// excluded, and how many of those were not excluded before.
fn exclude_where(profile: &mut Profile, select: impl Fn(&ProfileBlock) -> bool) -> (usize, usize) {
    let mut matched = 0;
    let mut newly = 0;
    for block in profile.blocks.iter_mut().filter(|b| select(b)) {
        let was_excluded = block.is_excluded();
        if block.exclude_if_unexecuted() {
            matched += 1;
            if !was_excluded {
                newly += 1;
            }
        }
    }
    (matched, newly)
}
