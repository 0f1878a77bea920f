//! Coverage Text Format
//!
//! Line-oriented profile format shared by the raw input and the filtered
//! artifact:
//!
//! ```text
//! mode: <set|count|atomic>
//! <file>:<startLine>.<startCol>,<endLine>.<endCol> <numStatements> <hitCount>
//! ```
//!
//! Profiles produced by several test binaries are often concatenated, so
//! repeated `mode:` headers are accepted as long as they agree, and records
//! that repeat a range already seen for the same file are merged into the
//! first occurrence.

use super::model::{Mode, UnknownMode};
use super::raw::{RawBlock, RawProfile};
use crate::result::{CovgateError, CovgateResult};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

const MODE_PREFIX: &str = "mode:";

type RangeKey = (u32, u32, u32, u32);

/// Parse profile text into per-file raw profiles, in first-seen file order
pub fn parse_profiles(input: &str) -> CovgateResult<Vec<RawProfile>> {
    let mut mode: Option<Mode> = None;
    let mut profiles: Vec<RawProfile> = Vec::new();
    let mut by_file: HashMap<String, usize> = HashMap::new();
    let mut ranges: Vec<HashMap<RangeKey, usize>> = Vec::new();

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(tag) = line.strip_prefix(MODE_PREFIX) {
            let found: Mode = tag
                .trim()
                .parse()
                .map_err(|e: UnknownMode| CovgateError::parse(line_no, e.to_string()))?;
            match mode {
                None => mode = Some(found),
                Some(expected) if expected != found => {
                    return Err(CovgateError::ModeMismatch {
                        line: line_no,
                        expected,
                        found,
                    });
                }
                Some(_) => {}
            }
            continue;
        }

        let Some(current) = mode else {
            return Err(CovgateError::parse(
                line_no,
                "expected 'mode:' header before block records",
            ));
        };

        let (file_name, block) = parse_block_line(line, line_no)?;

        let slot = match by_file.get(file_name).copied() {
            Some(slot) => slot,
            None => {
                let slot = profiles.len();
                profiles.push(RawProfile::new(file_name, current));
                ranges.push(HashMap::new());
                let _ = by_file.insert(file_name.to_string(), slot);
                slot
            }
        };

        let key = (
            block.start_line,
            block.start_col,
            block.end_line,
            block.end_col,
        );
        let profile = &mut profiles[slot];
        match ranges[slot].get(&key).copied() {
            Some(pos) => {
                let existing = &mut profile.blocks[pos];
                existing.hit_count = current.merge_hits(existing.hit_count, block.hit_count);
            }
            None => {
                let _ = ranges[slot].insert(key, profile.blocks.len());
                profile.blocks.push(block);
            }
        }
    }

    Ok(profiles)
}

fn parse_block_line(line: &str, line_no: usize) -> CovgateResult<(&str, RawBlock)> {
    let mut fields = line.rsplitn(3, ' ');
    let hits = fields.next();
    let stmts = fields.next();
    let location = fields.next();
    let (Some(location), Some(stmts), Some(hits)) = (location, stmts, hits) else {
        return Err(CovgateError::parse(
            line_no,
            "expected '<file>:<range> <statements> <count>'",
        ));
    };

    let (file_name, range) = location
        .rsplit_once(':')
        .ok_or_else(|| CovgateError::parse(line_no, "missing ':' between file and range"))?;
    if file_name.is_empty() {
        return Err(CovgateError::parse(line_no, "empty file name"));
    }

    let (start, end) = range
        .split_once(',')
        .ok_or_else(|| CovgateError::parse(line_no, "range must be '<line>.<col>,<line>.<col>'"))?;
    let (start_line, start_col) = parse_position(start, line_no)?;
    let (end_line, end_col) = parse_position(end, line_no)?;

    let block = RawBlock {
        start_line,
        start_col,
        end_line,
        end_col,
        num_statements: parse_number(stmts, "statement count", line_no)?,
        hit_count: parse_number(hits, "hit count", line_no)?,
    };
    Ok((file_name, block))
}

fn parse_position(text: &str, line_no: usize) -> CovgateResult<(u32, u32)> {
    let (line, col) = text
        .split_once('.')
        .ok_or_else(|| CovgateError::parse(line_no, format!("invalid position '{text}'")))?;
    Ok((
        parse_number(line, "line", line_no)?,
        parse_number(col, "column", line_no)?,
    ))
}

fn parse_number<T: std::str::FromStr>(text: &str, what: &str, line_no: usize) -> CovgateResult<T> {
    text.parse()
        .map_err(|_| CovgateError::parse(line_no, format!("invalid {what} '{text}'")))
}

/// Render raw profiles in the coverage text format.
///
/// The format carries a single `mode:` header, so every profile must share
/// the mode of the first one (`set` when there are none).
pub fn render_profiles(profiles: &[RawProfile]) -> CovgateResult<String> {
    let mode = profiles.first().map_or(Mode::Set, |p| p.mode);
    if let Some(other) = profiles.iter().find(|p| p.mode != mode) {
        return Err(CovgateError::MixedModes {
            file: other.file_name.clone(),
            expected: mode,
            found: other.mode,
        });
    }

    let mut output = String::new();
    let _ = writeln!(output, "{MODE_PREFIX} {mode}");
    for profile in profiles {
        for b in &profile.blocks {
            let _ = writeln!(
                output,
                "{}:{}.{},{}.{} {} {}",
                profile.file_name,
                b.start_line,
                b.start_col,
                b.end_line,
                b.end_col,
                b.num_statements,
                b.hit_count
            );
        }
    }
    Ok(output)
}

/// Read and parse a profile file
pub fn read_profiles(path: &Path) -> CovgateResult<Vec<RawProfile>> {
    let content = std::fs::read_to_string(path)?;
    parse_profiles(&content)
}

/// Write profiles to `path` in the coverage text format
pub fn write_profiles(path: &Path, profiles: &[RawProfile]) -> CovgateResult<()> {
    std::fs::write(path, render_profiles(profiles)?)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    const SAMPLE: &str = "mode: set
a/b/c.go:10.2,12.16 2 0
a/b/c.go:14.2,15.3 1 1
a/d.go:3.13,5.2 1 1
";

    #[test]
    fn test_parse_sample() {
        let profiles = parse_profiles(SAMPLE).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].file_name, "a/b/c.go");
        assert_eq!(profiles[0].mode, Mode::Set);
        assert_eq!(
            profiles[0].blocks[0],
            RawBlock {
                start_line: 10,
                start_col: 2,
                end_line: 12,
                end_col: 16,
                num_statements: 2,
                hit_count: 0,
            }
        );
        assert_eq!(profiles[1].blocks.len(), 1);
    }

    #[test]
    fn test_render_reproduces_input() {
        let profiles = parse_profiles(SAMPLE).unwrap();
        assert_eq!(render_profiles(&profiles).unwrap(), SAMPLE);
    }

    #[test]
    fn test_render_empty_uses_set_header() {
        assert_eq!(render_profiles(&[]).unwrap(), "mode: set\n");
    }

    #[test]
    fn test_file_names_may_contain_colons() {
        let text = "mode: count\nC:/src/x.go:1.1,2.2 1 4\n";
        let profiles = parse_profiles(text).unwrap();
        assert_eq!(profiles[0].file_name, "C:/src/x.go");
        assert_eq!(profiles[0].blocks[0].hit_count, 4);
    }

    #[test]
    fn test_duplicate_ranges_merge_in_set_mode() {
        let text = "mode: set\nx.go:1.1,2.2 1 0\nx.go:3.1,4.2 1 0\nmode: set\nx.go:1.1,2.2 1 1\n";
        let profiles = parse_profiles(text).unwrap();
        assert_eq!(profiles[0].blocks.len(), 2);
        assert_eq!(profiles[0].blocks[0].hit_count, 1);
        assert_eq!(profiles[0].blocks[1].start_line, 3);
    }

    #[test]
    fn test_duplicate_ranges_sum_in_count_mode() {
        let text = "mode: count\nx.go:1.1,2.2 1 2\nx.go:1.1,2.2 1 5\n";
        let profiles = parse_profiles(text).unwrap();
        assert_eq!(profiles[0].blocks.len(), 1);
        assert_eq!(profiles[0].blocks[0].hit_count, 7);
    }

    #[test]
    fn test_missing_header_is_rejected() {
        let err = parse_profiles("x.go:1.1,2.2 1 2\n").unwrap_err();
        assert!(matches!(err, CovgateError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_conflicting_modes_are_rejected() {
        let err = parse_profiles("mode: set\nmode: atomic\n").unwrap_err();
        assert!(matches!(
            err,
            CovgateError::ModeMismatch {
                line: 2,
                expected: Mode::Set,
                found: Mode::Atomic
            }
        ));
    }

    #[test]
    fn test_render_rejects_mixed_modes() {
        let mut counted = RawProfile::new("b.go", Mode::Count);
        counted.blocks.push(RawBlock {
            start_line: 1,
            start_col: 1,
            end_line: 2,
            end_col: 2,
            num_statements: 1,
            hit_count: 7,
        });
        let profiles = vec![RawProfile::new("a.go", Mode::Set), counted];

        let err = render_profiles(&profiles).unwrap_err();

        match err {
            CovgateError::MixedModes {
                file,
                expected,
                found,
            } => {
                assert_eq!(file, "b.go");
                assert_eq!(expected, Mode::Set);
                assert_eq!(found, Mode::Count);
            }
            other => panic!("expected mixed modes, got {other:?}"),
        }
    }

    #[test]
    fn test_write_mixed_modes_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coverage.out");
        let profiles = vec![
            RawProfile::new("a.go", Mode::Atomic),
            RawProfile::new("b.go", Mode::Count),
        ];

        assert!(write_profiles(&path, &profiles).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_uniform_non_set_mode_round_trips() {
        let text = "mode: count\na.go:1.1,2.2 1 3\nb.go:4.1,5.2 2 0\n";
        let profiles = parse_profiles(text).unwrap();

        let back = parse_profiles(&render_profiles(&profiles).unwrap()).unwrap();

        assert_eq!(back, profiles);
        assert!(back.iter().all(|p| p.mode == Mode::Count));
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let err = parse_profiles("mode: sometimes\n").unwrap_err();
        assert!(err.to_string().contains("sometimes"));
    }

    #[test]
    fn test_malformed_records_report_line() {
        for bad in [
            "x.go:1.1,2.2 1",
            "x.go 1 1",
            "x.go:1.1-2.2 1 1",
            "x.go:1,2.2 1 1",
            "x.go:1.1,2.2 one 1",
            "x.go:1.1,2.2 1 -1",
            ":1.1,2.2 1 1",
        ] {
            let text = format!("mode: set\n\n{bad}\n");
            match parse_profiles(&text) {
                Err(CovgateError::Parse { line, .. }) => assert_eq!(line, 3, "{bad}"),
                other => panic!("expected parse error for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_read_and_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coverage.out");
        let profiles = parse_profiles(SAMPLE).unwrap();

        write_profiles(&path, &profiles).unwrap();
        assert_eq!(read_profiles(&path).unwrap(), profiles);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_profiles(Path::new("/nonexistent/coverage.raw")).unwrap_err();
        assert!(matches!(err, CovgateError::Io(_)));
    }
}
