//! Whistle open/close state machine.
//!
//! Two thresholds (hysteresis) plus a hold-time dwell: energy must climb
//! well above the noise floor to open a whistle, and must stay below a
//! lower threshold for a continuous hold period before the whistle is
//! considered finished. Momentary dips inside a long blast do not split
//! it into multiple events.

use crate::detect::detector::DetectorConfig;
use crate::detect::types::{DetectorEvent, WhistleEvent};

/// Transient bookkeeping for an open whistle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhistleSession {
    /// Seconds since stream start when the whistle opened.
    pub start_time: f64,
    /// When energy most recently dropped below the fall threshold and has
    /// stayed there. Cleared whenever energy bounces back above it.
    pub low_since: Option<f64>,
}

/// Current phase of whistle tracking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WhistlePhase {
    /// Waiting for energy to rise above the open threshold.
    Idle,
    /// Tracking an open whistle.
    InWhistle(WhistleSession),
}

/// Hysteresis + hold-time debounce over (energy, floor, time) triples.
///
/// Runs indefinitely; there is no terminal state. A whistle that is still
/// open when the stream ends is never emitted.
#[derive(Debug, Clone)]
pub struct WhistleStateMachine {
    rise_multiplier: f32,
    fall_multiplier: f32,
    hold_seconds: f64,
    min_duration: f64,
    max_duration: f64,
    phase: WhistlePhase,
    count: u32,
}

impl WhistleStateMachine {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            rise_multiplier: config.rise_multiplier,
            fall_multiplier: config.fall_multiplier,
            hold_seconds: config.hold_seconds,
            min_duration: config.min_duration,
            max_duration: config.max_duration,
            phase: WhistlePhase::Idle,
            count: 0,
        }
    }

    /// Advances the machine by one block.
    ///
    /// `floor` must be the value already updated for this same block — the
    /// comparison deliberately uses the freshest estimate, which means a
    /// long whistle raises the baseline it is measured against.
    pub fn advance(&mut self, energy: f32, floor: f32, now: f64) -> Option<DetectorEvent> {
        match self.phase {
            WhistlePhase::Idle => {
                if energy > self.rise_multiplier * floor {
                    self.phase = WhistlePhase::InWhistle(WhistleSession {
                        start_time: now,
                        low_since: None,
                    });
                    Some(DetectorEvent::WhistleStart {
                        at: now,
                        energy,
                        floor,
                    })
                } else {
                    None
                }
            }
            WhistlePhase::InWhistle(mut session) => {
                if energy < self.fall_multiplier * floor {
                    let low_since = *session.low_since.get_or_insert(now);
                    if now - low_since >= self.hold_seconds {
                        self.phase = WhistlePhase::Idle;
                        return Some(DetectorEvent::WhistleEnd(self.close(session.start_time, now)));
                    }
                    self.phase = WhistlePhase::InWhistle(session);
                    None
                } else {
                    // Energy bounced back: discard any progress toward closing.
                    session.low_since = None;
                    self.phase = WhistlePhase::InWhistle(session);
                    None
                }
            }
        }
    }

    fn close(&mut self, start_time: f64, now: f64) -> WhistleEvent {
        let duration = now - start_time;
        let accepted = duration >= self.min_duration && duration <= self.max_duration;
        let count = if accepted {
            self.count += 1;
            self.count
        } else {
            0
        };
        WhistleEvent {
            start_time,
            end_time: now,
            duration,
            accepted,
            count,
        }
    }

    /// Current phase, including the open session's bookkeeping.
    pub fn phase(&self) -> WhistlePhase {
        self.phase
    }

    /// True while a whistle is open.
    pub fn is_active(&self) -> bool {
        matches!(self.phase, WhistlePhase::InWhistle(_))
    }

    /// Accepted whistles so far.
    pub fn count(&self) -> u32 {
        self.count
    }
}
