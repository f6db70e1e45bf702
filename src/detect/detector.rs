//! Per-block detection orchestration.

use crate::audio::block::AudioBlock;
use crate::defaults;
use crate::detect::energy::rms;
use crate::detect::noise_floor::{FloorUpdate, NoiseFloorTracker};
use crate::detect::state_machine::WhistleStateMachine;
use crate::detect::types::DetectorEvent;
use crate::error::{Result, WhistledError};

/// Tunable detection parameters, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Audio sampling rate (Hz).
    pub sample_rate: u32,
    /// Samples per processing block.
    pub block_size: usize,
    /// Minimum accepted whistle length (s).
    pub min_duration: f64,
    /// Maximum accepted whistle length (s).
    pub max_duration: f64,
    /// Energy/floor ratio that opens a whistle.
    pub rise_multiplier: f32,
    /// Energy/floor ratio below which a close candidate begins.
    pub fall_multiplier: f32,
    /// Continuous low-energy dwell required before closing (s).
    pub hold_seconds: f64,
    /// Noise-floor smoothing factor (0–1].
    pub alpha: f32,
    /// Initial detection-suppressed period (s).
    pub warmup_seconds: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
            block_size: defaults::BLOCK_SIZE,
            min_duration: defaults::MIN_WHISTLE_SECS,
            max_duration: defaults::MAX_WHISTLE_SECS,
            rise_multiplier: defaults::RISE_MULTIPLIER,
            fall_multiplier: defaults::FALL_MULTIPLIER,
            hold_seconds: defaults::HOLD_SECS,
            alpha: defaults::FLOOR_ALPHA,
            warmup_seconds: defaults::WARMUP_SECS,
        }
    }
}

impl DetectorConfig {
    /// Checks every parameter constraint.
    ///
    /// Called once at construction; an inconsistent configuration (most
    /// importantly an inverted hysteresis band) must never reach the
    /// processing loop.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(invalid("sample_rate", "must be positive"));
        }
        if self.block_size == 0 {
            return Err(invalid("block_size", "must be positive"));
        }
        if self.min_duration < 0.0 {
            return Err(invalid("min_duration", "must not be negative"));
        }
        if self.min_duration > self.max_duration {
            return Err(invalid(
                "max_duration",
                "must be at least min_duration",
            ));
        }
        if self.rise_multiplier <= 0.0 {
            return Err(invalid("rise_multiplier", "must be positive"));
        }
        if self.fall_multiplier <= 0.0 {
            return Err(invalid("fall_multiplier", "must be positive"));
        }
        if self.fall_multiplier >= self.rise_multiplier {
            return Err(invalid(
                "fall_multiplier",
                "must be smaller than rise_multiplier (hysteresis)",
            ));
        }
        if self.hold_seconds < 0.0 {
            return Err(invalid("hold_seconds", "must not be negative"));
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(invalid("alpha", "must be in (0, 1]"));
        }
        if self.warmup_seconds < 0.0 {
            return Err(invalid("warmup_seconds", "must not be negative"));
        }
        Ok(())
    }

    /// Seconds of audio covered by one block.
    pub fn block_duration_secs(&self) -> f64 {
        self.block_size as f64 / self.sample_rate as f64
    }
}

fn invalid(key: &str, message: &str) -> WhistledError {
    WhistledError::ConfigInvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

/// Sequences energy estimation, floor tracking, and the state machine over
/// an ordered stream of blocks.
///
/// Owns all mutable detection state. Single-writer: exactly one thread may
/// call [`process_block`](Self::process_block) — blocks must arrive in
/// order, and timestamps must be non-decreasing.
pub struct Detector {
    floor: NoiseFloorTracker,
    machine: WhistleStateMachine,
    /// Timestamp of the first block; all reported times are relative to it.
    origin: Option<f64>,
}

impl Detector {
    /// Builds a detector, validating the configuration first.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            floor: NoiseFloorTracker::new(config.alpha, config.warmup_seconds),
            machine: WhistleStateMachine::new(&config),
            origin: None,
        })
    }

    /// Processes one block, returning at most one event.
    ///
    /// The floor updates before the state machine looks at it, on every
    /// block — including blocks inside an open whistle.
    ///
    /// # Errors
    /// An empty block is a defect in the capture layer, not a recoverable
    /// condition: it is surfaced rather than skipped so the elapsed-time
    /// clock cannot silently desynchronize.
    pub fn process_block(&mut self, block: &AudioBlock) -> Result<Option<DetectorEvent>> {
        if block.samples.is_empty() {
            return Err(WhistledError::MalformedBlock {
                message: "empty sample buffer".to_string(),
            });
        }

        let origin = *self.origin.get_or_insert(block.timestamp);
        let now = block.timestamp - origin;
        let energy = rms(&block.samples);

        match self.floor.observe(energy, now) {
            FloorUpdate::Seeded | FloorUpdate::WarmingUp => Ok(None),
            FloorUpdate::Ready(floor) => Ok(self.machine.advance(energy, floor, now)),
        }
    }

    /// Accepted whistles so far.
    pub fn accepted_count(&self) -> u32 {
        self.machine.count()
    }

    /// Current noise floor estimate, `None` before the first block.
    pub fn noise_floor(&self) -> Option<f32> {
        self.floor.floor()
    }

    /// True while a whistle is open.
    pub fn is_active(&self) -> bool {
        self.machine.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(amplitude: f32, timestamp: f64) -> AudioBlock {
        AudioBlock::new(vec![amplitude; 1024], timestamp)
    }

    fn config() -> DetectorConfig {
        DetectorConfig {
            warmup_seconds: 0.0,
            ..DetectorConfig::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(DetectorConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_hysteresis_fails_before_any_block() {
        let config = DetectorConfig {
            rise_multiplier: 3.0,
            fall_multiplier: 3.0,
            ..DetectorConfig::default()
        };
        match Detector::new(config) {
            Err(WhistledError::ConfigInvalidValue { key, .. }) => {
                assert_eq!(key, "fall_multiplier");
            }
            other => panic!("expected ConfigInvalidValue, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn zero_alpha_is_rejected() {
        let config = DetectorConfig {
            alpha: 0.0,
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn min_above_max_is_rejected() {
        let config = DetectorConfig {
            min_duration: 5.0,
            max_duration: 2.0,
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn block_duration_matches_rate() {
        let config = DetectorConfig::default();
        assert!((config.block_duration_secs() - 0.064).abs() < 1e-9);
    }

    #[test]
    fn empty_block_is_a_malformed_block_error() {
        let mut detector = Detector::new(config()).unwrap();
        let empty = AudioBlock::new(Vec::new(), 0.0);
        assert!(matches!(
            detector.process_block(&empty),
            Err(WhistledError::MalformedBlock { .. })
        ));
    }

    #[test]
    fn seeding_block_never_detects() {
        let mut detector = Detector::new(config()).unwrap();
        // A deafening first block seeds the floor instead of opening a whistle.
        let event = detector.process_block(&block(0.9, 0.0)).unwrap();
        assert!(event.is_none());
        assert!(!detector.is_active());
        assert!(detector.noise_floor().is_some());
    }

    #[test]
    fn warmup_blocks_never_detect() {
        let mut detector = Detector::new(DetectorConfig {
            warmup_seconds: 1.0,
            ..DetectorConfig::default()
        })
        .unwrap();

        detector.process_block(&block(0.001, 0.0)).unwrap();
        // Loud blocks inside the warm-up window adapt the floor but are
        // suppressed from detection.
        for i in 1..15 {
            let event = detector.process_block(&block(0.5, i as f64 * 0.064)).unwrap();
            assert!(event.is_none(), "block {} detected during warm-up", i);
        }
        assert!(!detector.is_active());
    }

    #[test]
    fn reported_times_are_relative_to_stream_start() {
        let mut detector = Detector::new(config()).unwrap();

        // Device clock starts at an arbitrary absolute origin.
        let origin = 1234.5;
        detector.process_block(&block(0.001, origin)).unwrap();
        let event = detector
            .process_block(&block(0.05, origin + 0.064))
            .unwrap()
            .unwrap();
        match event {
            DetectorEvent::WhistleStart { at, .. } => {
                assert!((at - 0.064).abs() < 1e-9, "expected relative time, got {}", at)
            }
            DetectorEvent::WhistleEnd(_) => panic!("expected a start event"),
        }
    }

    #[test]
    fn whistle_opens_against_adapted_floor() {
        let mut detector = Detector::new(config()).unwrap();

        detector.process_block(&block(0.001, 0.0)).unwrap();
        for i in 1..20 {
            let event = detector.process_block(&block(0.001, i as f64 * 0.064)).unwrap();
            assert!(event.is_none());
        }

        let event = detector.process_block(&block(0.01, 20.0 * 0.064)).unwrap();
        assert!(event.is_some_and(|e| e.is_start()));
        assert!(detector.is_active());
    }

    #[test]
    fn accepted_count_tracks_machine() {
        let mut detector = Detector::new(config()).unwrap();
        detector.process_block(&block(0.001, 0.0)).unwrap();
        assert_eq!(detector.accepted_count(), 0);
    }
}
