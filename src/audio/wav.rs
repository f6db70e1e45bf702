//! WAV file sample source for offline runs.

use crate::audio::source::SampleSource;
use crate::error::{Result, WhistledError};
use std::io::Read;
use std::path::Path;

/// Sample source that reads from WAV file data.
///
/// Supports arbitrary sample rates and channel counts, mixing down to mono
/// and resampling to the detector's rate up front. Useful for tuning
/// thresholds against a recording instead of a live kitchen.
pub struct WavSampleSource {
    samples: Vec<f32>,
    position: usize,
    chunk_size: usize,
}

impl WavSampleSource {
    /// Open a WAV file from disk.
    pub fn open(path: &Path, target_rate: u32) -> Result<Self> {
        let reader = hound::WavReader::open(path).map_err(|e| WhistledError::AudioCapture {
            message: format!("Failed to open WAV file {}: {}", path.display(), e),
        })?;
        Self::from_wav_reader(reader, target_rate)
    }

    /// Create from any reader (for testing/flexibility).
    pub fn from_reader<R: Read>(reader: R, target_rate: u32) -> Result<Self> {
        let wav_reader = hound::WavReader::new(reader).map_err(|e| WhistledError::AudioCapture {
            message: format!("Failed to parse WAV data: {}", e),
        })?;
        Self::from_wav_reader(wav_reader, target_rate)
    }

    fn from_wav_reader<R: Read>(mut reader: hound::WavReader<R>, target_rate: u32) -> Result<Self> {
        let spec = reader.spec();
        let source_rate = spec.sample_rate;
        let channels = spec.channels as usize;

        let raw: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| WhistledError::AudioCapture {
                    message: format!("Failed to read WAV samples: {}", e),
                })?,
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| WhistledError::AudioCapture {
                        message: format!("Failed to read WAV samples: {}", e),
                    })?
            }
        };

        // Mix to mono by averaging channels
        let mono: Vec<f32> = if channels <= 1 {
            raw
        } else {
            raw.chunks_exact(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                .collect()
        };

        let samples = if source_rate != target_rate {
            resample(&mono, source_rate, target_rate)
        } else {
            mono
        };

        // Hand samples to the block stream in ~100ms slices
        let chunk_size = (target_rate / 10).max(1) as usize;

        Ok(Self {
            samples,
            position: 0,
            chunk_size,
        })
    }

    /// Consume the source and return all samples as a single buffer.
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Total seconds of audio in the file at the target rate.
    pub fn duration_secs(&self, target_rate: u32) -> f64 {
        self.samples.len() as f64 / target_rate as f64
    }
}

impl SampleSource for WavSampleSource {
    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    fn read_samples(&mut self) -> Result<Vec<f32>> {
        if self.position >= self.samples.len() {
            return Ok(Vec::new());
        }

        let end = std::cmp::min(self.position + self.chunk_size, self.samples.len());
        let chunk = self.samples[self.position..end].to_vec();
        self.position = end;

        Ok(chunk)
    }

    fn is_finite(&self) -> bool {
        true
    }
}

/// Simple linear interpolation resampling.
pub(crate) fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[samples.len() - 1]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as f32
            }
        })
        .collect()
}
