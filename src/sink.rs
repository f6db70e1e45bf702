//! Event sinks: where detection results go.
//!
//! The detection core performs no I/O; it hands every event to a sink.
//! Sinks must be cheap (format + print at most) because they run inline on
//! the detection task.

use crate::detect::types::DetectorEvent;
use crate::error::Result;
use crate::output;

/// Pluggable consumer for detection events.
/// Pairs with SampleSource on the input side.
pub trait EventSink: Send + 'static {
    /// Handle one detection event.
    fn handle(&mut self, event: &DetectorEvent) -> Result<()>;

    /// Called on shutdown. Returns the accepted total if tracked.
    fn finish(&mut self) -> Option<u32> {
        None
    }

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "sink"
    }
}

/// Prints events to the terminal and reports the final total.
pub struct ConsoleSink {
    quiet: bool,
    verbosity: u8,
    accepted: u32,
}

impl ConsoleSink {
    pub fn new(quiet: bool, verbosity: u8) -> Self {
        Self {
            quiet,
            verbosity,
            accepted: 0,
        }
    }

    /// Accepted whistles seen so far.
    pub fn accepted(&self) -> u32 {
        self.accepted
    }
}

impl EventSink for ConsoleSink {
    fn handle(&mut self, event: &DetectorEvent) -> Result<()> {
        if let Some(end) = event.as_end()
            && end.accepted
        {
            self.accepted = end.count;
        }
        if !self.quiet {
            output::render_event(event, self.verbosity);
        }
        Ok(())
    }

    fn finish(&mut self) -> Option<u32> {
        output::render_summary(self.accepted);
        Some(self.accepted)
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

/// Collects events in memory (tests, library use).
#[derive(Debug, Default)]
pub struct CollectorSink {
    events: Vec<DetectorEvent>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in arrival order.
    pub fn events(&self) -> &[DetectorEvent] {
        &self.events
    }

    /// Accepted whistles seen so far.
    pub fn accepted_count(&self) -> u32 {
        self.events
            .iter()
            .filter_map(DetectorEvent::as_end)
            .filter(|end| end.accepted)
            .count() as u32
    }
}

impl EventSink for CollectorSink {
    fn handle(&mut self, event: &DetectorEvent) -> Result<()> {
        self.events.push(*event);
        Ok(())
    }

    fn finish(&mut self) -> Option<u32> {
        Some(self.accepted_count())
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::types::WhistleEvent;

    fn start_event() -> DetectorEvent {
        DetectorEvent::WhistleStart {
            at: 1.0,
            energy: 0.01,
            floor: 0.001,
        }
    }

    fn end_event(accepted: bool, count: u32) -> DetectorEvent {
        DetectorEvent::WhistleEnd(WhistleEvent {
            start_time: 1.0,
            end_time: 4.0,
            duration: 3.0,
            accepted,
            count,
        })
    }

    #[test]
    fn collector_preserves_arrival_order() {
        let mut sink = CollectorSink::new();
        sink.handle(&start_event()).unwrap();
        sink.handle(&end_event(true, 1)).unwrap();

        assert_eq!(sink.events().len(), 2);
        assert!(sink.events()[0].is_start());
        assert!(sink.events()[1].as_end().is_some());
    }

    #[test]
    fn collector_counts_only_accepted_ends() {
        let mut sink = CollectorSink::new();
        sink.handle(&start_event()).unwrap();
        sink.handle(&end_event(true, 1)).unwrap();
        sink.handle(&end_event(false, 0)).unwrap();
        sink.handle(&end_event(true, 2)).unwrap();

        assert_eq!(sink.accepted_count(), 2);
        assert_eq!(sink.finish(), Some(2));
    }

    #[test]
    fn console_sink_tracks_running_count() {
        let mut sink = ConsoleSink::new(true, 0);
        sink.handle(&start_event()).unwrap();
        assert_eq!(sink.accepted(), 0);

        sink.handle(&end_event(true, 1)).unwrap();
        assert_eq!(sink.accepted(), 1);

        // Rejected events must not disturb the total.
        sink.handle(&end_event(false, 0)).unwrap();
        assert_eq!(sink.accepted(), 1);

        sink.handle(&end_event(true, 2)).unwrap();
        assert_eq!(sink.finish(), Some(2));
    }

    #[test]
    fn sink_names() {
        assert_eq!(ConsoleSink::new(false, 0).name(), "console");
        assert_eq!(CollectorSink::new().name(), "collector");
    }
}
