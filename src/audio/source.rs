//! Sample source boundary.

use crate::error::{Result, WhistledError};

/// Trait for sample-producing devices.
///
/// This trait allows swapping implementations (real audio device, WAV
/// file, mock). Sources deliver raw mono `f32` samples; slicing into
/// fixed-size blocks happens downstream in
/// [`BlockStream`](crate::audio::stream::BlockStream).
pub trait SampleSource: Send {
    /// Start producing samples.
    fn start(&mut self) -> Result<()>;

    /// Stop producing samples.
    fn stop(&mut self) -> Result<()>;

    /// Read whatever samples have accumulated since the last call.
    ///
    /// An empty vector means "nothing yet" for a live source, or "end of
    /// input" for a finite one.
    fn read_samples(&mut self) -> Result<Vec<f32>>;

    /// True when the source ends on its own (file input).
    fn is_finite(&self) -> bool {
        false
    }
}

/// Mock sample source for testing.
#[derive(Debug, Clone)]
pub struct MockSampleSource {
    is_started: bool,
    samples: Vec<f32>,
    exhausted: bool,
    finite: bool,
    should_fail_start: bool,
    should_fail_read: bool,
    error_message: String,
}

impl MockSampleSource {
    pub fn new() -> Self {
        Self {
            is_started: false,
            samples: vec![0.0; 160],
            exhausted: false,
            finite: false,
            should_fail_start: false,
            should_fail_read: false,
            error_message: "mock audio error".to_string(),
        }
    }

    /// Configure the mock to return specific samples.
    pub fn with_samples(mut self, samples: Vec<f32>) -> Self {
        self.samples = samples;
        self
    }

    /// Configure the mock to deliver its samples once, then report end of
    /// input (`is_finite` becomes true).
    pub fn finite(mut self) -> Self {
        self.finite = true;
        self
    }

    /// Configure the mock to fail on start.
    pub fn with_start_failure(mut self) -> Self {
        self.should_fail_start = true;
        self
    }

    /// Configure the mock to fail on read.
    pub fn with_read_failure(mut self) -> Self {
        self.should_fail_read = true;
        self
    }

    /// Configure the error message for failures.
    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }

    pub fn is_started(&self) -> bool {
        self.is_started
    }
}

impl Default for MockSampleSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for MockSampleSource {
    fn start(&mut self) -> Result<()> {
        if self.should_fail_start {
            Err(WhistledError::AudioCapture {
                message: self.error_message.clone(),
            })
        } else {
            self.is_started = true;
            Ok(())
        }
    }

    fn stop(&mut self) -> Result<()> {
        self.is_started = false;
        Ok(())
    }

    fn read_samples(&mut self) -> Result<Vec<f32>> {
        if self.should_fail_read {
            return Err(WhistledError::AudioCapture {
                message: self.error_message.clone(),
            });
        }
        if self.finite {
            if self.exhausted {
                return Ok(Vec::new());
            }
            self.exhausted = true;
        }
        Ok(self.samples.clone())
    }

    fn is_finite(&self) -> bool {
        self.finite
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_configured_samples() {
        let samples = vec![0.1f32, 0.2, 0.3];
        let mut source = MockSampleSource::new().with_samples(samples.clone());
        assert_eq!(source.read_samples().unwrap(), samples);
    }

    #[test]
    fn mock_repeats_samples_when_infinite() {
        let mut source = MockSampleSource::new().with_samples(vec![0.5f32; 8]);
        assert_eq!(source.read_samples().unwrap().len(), 8);
        assert_eq!(source.read_samples().unwrap().len(), 8);
        assert!(!source.is_finite());
    }

    #[test]
    fn finite_mock_delivers_once_then_empty() {
        let mut source = MockSampleSource::new().with_samples(vec![0.5f32; 8]).finite();
        assert!(source.is_finite());
        assert_eq!(source.read_samples().unwrap().len(), 8);
        assert!(source.read_samples().unwrap().is_empty());
        assert!(source.read_samples().unwrap().is_empty());
    }

    #[test]
    fn start_failure_surfaces_configured_message() {
        let mut source = MockSampleSource::new()
            .with_start_failure()
            .with_error_message("device unplugged");
        match source.start() {
            Err(WhistledError::AudioCapture { message }) => {
                assert_eq!(message, "device unplugged");
            }
            _ => panic!("expected AudioCapture error"),
        }
        assert!(!source.is_started());
    }

    #[test]
    fn read_failure_surfaces_error() {
        let mut source = MockSampleSource::new().with_read_failure();
        assert!(source.read_samples().is_err());
    }

    #[test]
    fn start_stop_state_management() {
        let mut source = MockSampleSource::new();
        assert!(!source.is_started());
        source.start().unwrap();
        assert!(source.is_started());
        source.stop().unwrap();
        assert!(!source.is_started());
    }

    #[test]
    fn trait_is_object_safe() {
        let mut source: Box<dyn SampleSource> =
            Box::new(MockSampleSource::new().with_samples(vec![0.1f32, 0.2]));
        assert!(source.start().is_ok());
        assert_eq!(source.read_samples().unwrap(), vec![0.1f32, 0.2]);
        assert!(source.stop().is_ok());
    }
}
