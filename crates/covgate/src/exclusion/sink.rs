//! Reporting sinks for exclusion events
//!
//! Passes never print. They hand every [`ExclusionEvent`] to a sink chosen by
//! the caller.

use super::ExclusionEvent;

/// Receiver of exclusion audit records
pub trait ExclusionSink {
    /// Accept one event
    fn record(&mut self, event: ExclusionEvent);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ExclusionSink for NullSink {
    fn record(&mut self, _event: ExclusionEvent) {}
}

/// Emits each event as a `tracing` info event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ExclusionSink for TracingSink {
    fn record(&mut self, event: ExclusionEvent) {
        tracing::info!(kind = %event.kind(), file = event.file(), "{event}");
    }
}

/// Keeps every event in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Vec<ExclusionEvent>,
}

impl RecordingSink {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far
    #[must_use]
    pub fn events(&self) -> &[ExclusionEvent] {
        &self.events
    }

    /// Take ownership of the recorded events
    #[must_use]
    pub fn into_events(self) -> Vec<ExclusionEvent> {
        self.events
    }

    /// Number of recorded events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl ExclusionSink for RecordingSink {
    fn record(&mut self, event: ExclusionEvent) {
        self.events.push(event);
    }
}

impl<S: ExclusionSink + ?Sized> ExclusionSink for &mut S {
    fn record(&mut self, event: ExclusionEvent) {
        (**self).record(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> ExclusionEvent {
        ExclusionEvent::File {
            file: "x.go".to_string(),
        }
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        sink.record(event());
        sink.record(ExclusionEvent::File {
            file: "y.go".to_string(),
        });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.events()[1].file(), "y.go");
        assert_eq!(sink.into_events()[0], event());
    }

    #[test]
    fn test_null_and_tracing_sinks_accept_events() {
        NullSink.record(event());
        TracingSink.record(event());
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn feed(mut sink: impl ExclusionSink) {
            sink.record(event());
        }

        let mut inner = RecordingSink::new();
        feed(&mut inner);
        feed(&mut inner);
        assert_eq!(inner.len(), 2);
    }
}
