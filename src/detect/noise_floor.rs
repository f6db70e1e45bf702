//! Adaptive noise-floor estimation.
//!
//! Tracks ambient energy with an exponential moving average so the state
//! machine can compare block energy against "how loud the room usually is".

/// Outcome of feeding one block's energy to the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FloorUpdate {
    /// First block ever observed: the floor was seeded from it.
    /// The seeding block never participates in detection.
    Seeded,
    /// Inside the warm-up window: floor updated, detection suppressed.
    WarmingUp,
    /// Floor updated and usable; carries the value for this block.
    Ready(f32),
}

/// Exponentially-smoothed ambient energy baseline.
///
/// The floor is seeded from the first block's energy rather than a fixed
/// constant, avoiding a long cold-start mismatch when the room is louder
/// or quieter than any hardcoded guess. After seeding it updates on every
/// block — including blocks inside an open whistle, so a long blast pulls
/// the baseline up toward itself. Only the *use* of the floor is gated by
/// the warm-up window; the value itself always tracks.
#[derive(Debug, Clone)]
pub struct NoiseFloorTracker {
    /// Smoothing factor (0–1). Closer to 0 moves slower and resists noise;
    /// larger values track faster but chase whistle energy upward.
    alpha: f32,
    /// Detection-suppressed period measured from the first block's time.
    warmup_secs: f64,
    floor: Option<f32>,
}

impl NoiseFloorTracker {
    pub fn new(alpha: f32, warmup_secs: f64) -> Self {
        Self {
            alpha,
            warmup_secs,
            floor: None,
        }
    }

    /// Feeds one block's energy.
    ///
    /// `now` is seconds since the first block of the stream (the seeding
    /// block observes `now == 0`).
    pub fn observe(&mut self, energy: f32, now: f64) -> FloorUpdate {
        let Some(floor) = self.floor else {
            self.floor = Some(energy);
            return FloorUpdate::Seeded;
        };

        let updated = (1.0 - self.alpha) * floor + self.alpha * energy;
        self.floor = Some(updated);

        if now < self.warmup_secs {
            FloorUpdate::WarmingUp
        } else {
            FloorUpdate::Ready(updated)
        }
    }

    /// Current floor estimate, `None` before the first block.
    pub fn floor(&self) -> Option<f32> {
        self.floor
    }

    pub fn is_seeded(&self) -> bool {
        self.floor.is_some()
    }
}
