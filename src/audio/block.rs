//! Block type delivered to the detector.

/// One mono block of samples with its capture timestamp.
///
/// Owned by the capture layer; the detector borrows it read-only for a
/// single processing step and keeps no reference afterward.
#[derive(Debug, Clone)]
pub struct AudioBlock {
    /// Mono samples in [-1.0, 1.0].
    pub samples: Vec<f32>,
    /// Seconds since an arbitrary stream origin; non-decreasing across
    /// blocks.
    pub timestamp: f64,
}

impl AudioBlock {
    pub fn new(samples: Vec<f32>, timestamp: f64) -> Self {
        Self { samples, timestamp }
    }

    /// Seconds of audio this block covers at the given rate.
    pub fn duration_secs(&self, sample_rate: u32) -> f64 {
        self.samples.len() as f64 / sample_rate as f64
    }
}
