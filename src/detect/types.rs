//! Event types emitted by the detection core.

/// Immutable record of a closed whistle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhistleEvent {
    /// Seconds since stream start when the whistle opened.
    pub start_time: f64,
    /// Seconds since stream start when the close was confirmed.
    pub end_time: f64,
    /// `end_time - start_time`.
    pub duration: f64,
    /// True iff the duration fell inside the accepted window.
    pub accepted: bool,
    /// Running accepted total at the moment of acceptance (0 if rejected).
    pub count: u32,
}

/// Detection outcome for one block.
///
/// At most one of these is produced per block: a whistle cannot open and
/// close within the same block (closing requires an already-open whistle).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectorEvent {
    /// Energy rose above the open threshold.
    WhistleStart {
        /// Seconds since stream start.
        at: f64,
        /// Block energy at the moment of opening.
        energy: f32,
        /// Noise floor at the moment of opening.
        floor: f32,
    },
    /// An open whistle closed after the hold time elapsed.
    WhistleEnd(WhistleEvent),
}

impl DetectorEvent {
    /// Returns true if this is a whistle start.
    pub fn is_start(&self) -> bool {
        matches!(self, DetectorEvent::WhistleStart { .. })
    }

    /// Returns the close record if this is a whistle end.
    pub fn as_end(&self) -> Option<&WhistleEvent> {
        match self {
            DetectorEvent::WhistleEnd(event) => Some(event),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end_event(accepted: bool, count: u32) -> DetectorEvent {
        DetectorEvent::WhistleEnd(WhistleEvent {
            start_time: 1.0,
            end_time: 4.5,
            duration: 3.5,
            accepted,
            count,
        })
    }

    #[test]
    fn start_accessors() {
        let event = DetectorEvent::WhistleStart {
            at: 2.0,
            energy: 0.01,
            floor: 0.001,
        };
        assert!(event.is_start());
        assert!(event.as_end().is_none());
    }

    #[test]
    fn end_accessors() {
        let event = end_event(true, 3);
        assert!(!event.is_start());
        let end = event.as_end().unwrap();
        assert!(end.accepted);
        assert_eq!(end.count, 3);
        assert_eq!(end.duration, 3.5);
    }

    #[test]
    fn rejected_event_carries_zero_count() {
        let end = *end_event(false, 0).as_end().unwrap();
        assert!(!end.accepted);
        assert_eq!(end.count, 0);
    }

    #[test]
    fn event_equality() {
        assert_eq!(end_event(true, 1), end_event(true, 1));
        assert_ne!(end_event(true, 1), end_event(false, 0));
    }
}
