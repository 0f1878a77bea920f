//! Console output and exclusion reporting

use console::{style, Style, Term};
use covgate::{
    CompletenessError, CoverageStats, ExclusionEvent, ExclusionKind, ExclusionSink,
    ExclusionSummary, RecordingSink,
};

/// Writes status lines to stderr
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            use_color,
            quiet,
        }
    }

    /// Print a plain line
    pub fn line(&self, message: &str) {
        if self.quiet {
            return;
        }
        let _ = self.term.write_line(message);
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Failures print even in quiet mode
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&styled);
    }

    /// Print every violation followed by the count
    pub fn violations(&self, error: &CompletenessError) {
        for violation in error.violations() {
            self.failure(&violation.to_string());
        }
        self.failure(&error.to_string());
    }

    /// Print per-pass exclusion counts
    pub fn exclusions(&self, summary: &ExclusionSummary) {
        if self.quiet || summary.is_empty() {
            return;
        }
        for kind in ExclusionKind::ALL {
            let count = summary.count(kind);
            if count == 0 {
                continue;
            }
            let unit = if kind.is_profile_level() { "files" } else { "blocks" };
            self.info(&format!("{kind}: {count} {unit} excluded"));
        }
    }

    /// Print the coverage totals of a passing run
    pub fn summary(&self, stats: &CoverageStats) {
        if self.quiet {
            return;
        }

        let _ = self.term.write_line("");
        let percent = stats.percent();

        if self.use_color {
            let passed_style = Style::new().green().bold();
            let _ = self.term.write_line(&format!(
                "{} {} of {} statements covered ({:.1}%) in {} files",
                passed_style.apply_to("PASSED"),
                stats.covered_statements,
                stats.statements,
                percent,
                stats.files
            ));
        } else {
            let _ = self.term.write_line(&format!(
                "PASSED {} of {} statements covered ({percent:.1}%) in {} files",
                stats.covered_statements, stats.statements, stats.files
            ));
        }
    }
}

/// Prints each exclusion as it happens, optionally keeping it for the audit file
#[derive(Debug)]
pub struct ConsoleSink<'a> {
    reporter: &'a Reporter,
    audit: Option<RecordingSink>,
}

impl<'a> ConsoleSink<'a> {
    /// Print-only sink
    #[must_use]
    pub const fn new(reporter: &'a Reporter) -> Self {
        Self {
            reporter,
            audit: None,
        }
    }

    /// Also keep every event
    #[must_use]
    pub fn with_audit(mut self) -> Self {
        self.audit = Some(RecordingSink::new());
        self
    }

    /// Kept events, if auditing was enabled
    #[must_use]
    pub fn into_audit(self) -> Option<Vec<ExclusionEvent>> {
        self.audit.map(RecordingSink::into_events)
    }
}

impl ExclusionSink for ConsoleSink<'_> {
    fn record(&mut self, event: ExclusionEvent) {
        self.reporter.line(&event.to_string());
        tracing::debug!(kind = %event.kind(), file = event.file(), "exclusion recorded");
        if let Some(audit) = self.audit.as_mut() {
            audit.record(event);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use covgate::Violation;

    mod reporter_tests {
        use super::*;

        #[test]
        fn test_new_reporter() {
            let reporter = Reporter::new(true, false);
            assert!(reporter.use_color);
            assert!(!reporter.quiet);
        }

        #[test]
        fn test_default_reporter() {
            let reporter = Reporter::default();
            assert!(reporter.use_color);
            assert!(!reporter.quiet);
        }

        #[test]
        fn test_messages() {
            let reporter = Reporter::new(false, false);
            reporter.success("gate passed");
            reporter.failure("gate failed");
            reporter.warning("no facts");
            reporter.info("3 files");
            reporter.header("Exclusions");
            reporter.line("Excluding file a/b.go");
            // No panic = success
        }

        #[test]
        fn test_violations() {
            let reporter = Reporter::new(false, true);
            let err = CompletenessError::new(vec![Violation {
                file: "a/b/c.go".to_string(),
                start_line: 10,
                end_line: 12,
            }]);
            reporter.violations(&err);
        }

        #[test]
        fn test_exclusions_and_summary() {
            let reporter = Reporter::new(true, false);
            let mut summary = ExclusionSummary::new();
            summary.add(ExclusionKind::File, 1);
            summary.add(ExclusionKind::Wrap, 2);
            reporter.exclusions(&summary);
            reporter.summary(&CoverageStats::default());
        }
    }

    mod console_sink_tests {
        use super::*;

        fn event() -> ExclusionEvent {
            ExclusionEvent::File {
                file: "a/b.go".to_string(),
            }
        }

        #[test]
        fn test_print_only_keeps_nothing() {
            let reporter = Reporter::new(false, true);
            let mut sink = ConsoleSink::new(&reporter);
            sink.record(event());
            assert!(sink.into_audit().is_none());
        }

        #[test]
        fn test_audit_keeps_events_in_order() {
            let reporter = Reporter::new(false, true);
            let mut sink = ConsoleSink::new(&reporter).with_audit();
            sink.record(event());
            sink.record(ExclusionEvent::Block {
                file: "a/b.go".to_string(),
                line: 4,
            });

            let events = sink.into_audit().unwrap();

            assert_eq!(events.len(), 2);
            assert_eq!(events[0], event());
            assert_eq!(events[1].kind(), ExclusionKind::Block);
        }
    }
}
