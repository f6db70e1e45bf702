//! Block delivery for continuous detection.
//!
//! Wraps a sample source and provides:
//! - A dedicated polling thread, decoupled from detection timing
//! - Slicing of the raw sample stream into fixed-size blocks
//! - A derived per-block timestamp (cumulative samples / rate)

use crate::audio::block::AudioBlock;
use crate::audio::source::SampleSource;
use crate::defaults;
use crate::error::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;

/// Configuration for the block stream.
#[derive(Debug, Clone)]
pub struct BlockStreamConfig {
    /// Samples per emitted block.
    pub block_size: usize,
    /// Sample rate used to derive block timestamps (Hz).
    pub sample_rate: u32,
    /// Channel buffer size (number of blocks to buffer).
    pub channel_buffer_size: usize,
    /// Polling interval when no samples are available (ms).
    pub poll_interval_ms: u64,
}

impl Default for BlockStreamConfig {
    fn default() -> Self {
        Self {
            block_size: defaults::BLOCK_SIZE,
            sample_rate: defaults::SAMPLE_RATE,
            channel_buffer_size: defaults::CHANNEL_BUFFER_SIZE,
            poll_interval_ms: defaults::POLL_INTERVAL_MS,
        }
    }
}

/// Continuously reads a sample source and emits timestamped blocks.
///
/// Timestamps are derived from the cumulative sample count rather than a
/// wall clock: monotonic, gap-free, and identical between live capture and
/// file input, which makes detection runs reproducible.
pub struct BlockStream<S: SampleSource> {
    source: S,
    config: BlockStreamConfig,
    running: Arc<AtomicBool>,
}

impl<S: SampleSource + 'static> BlockStream<S> {
    /// Creates a block stream with default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, BlockStreamConfig::default())
    }

    /// Creates a block stream with custom configuration.
    pub fn with_config(source: S, config: BlockStreamConfig) -> Self {
        Self {
            source,
            config,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts the source and the polling thread.
    ///
    /// Returns a receiver for blocks. Delivery runs until the source ends
    /// (finite input), `stop()` is called, or the receiver is dropped.
    /// A trailing partial block from a finite source is delivered as-is.
    pub fn start(mut self) -> Result<(mpsc::Receiver<AudioBlock>, BlockStreamHandle)> {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let running = self.running.clone();

        self.source.start()?;
        running.store(true, Ordering::SeqCst);

        let handle = BlockStreamHandle {
            running: self.running.clone(),
        };

        let block_size = self.config.block_size;
        let rate = self.config.sample_rate as f64;
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);

        thread::spawn(move || {
            let mut pending: Vec<f32> = Vec::new();
            // Samples already handed out as blocks; start time of the next block.
            let mut consumed: u64 = 0;

            'capture: while running.load(Ordering::SeqCst) {
                match self.source.read_samples() {
                    Ok(samples) if !samples.is_empty() => {
                        pending.extend_from_slice(&samples);
                        while pending.len() >= block_size {
                            let rest = pending.split_off(block_size);
                            let samples = std::mem::replace(&mut pending, rest);
                            let block = AudioBlock::new(samples, consumed as f64 / rate);
                            consumed += block_size as u64;

                            if tx.blocking_send(block).is_err() {
                                // Receiver dropped
                                break 'capture;
                            }
                        }
                    }
                    Ok(_) => {
                        if self.source.is_finite() {
                            break;
                        }
                        thread::sleep(poll_interval);
                    }
                    Err(e) => {
                        eprintln!("whistled: audio capture error: {}", e);
                        break;
                    }
                }
            }

            // Flush the tail so a whistle ending at EOF can still close.
            if !pending.is_empty() && running.load(Ordering::SeqCst) {
                let block = AudioBlock::new(pending, consumed as f64 / rate);
                let _ = tx.blocking_send(block);
            }

            if let Err(e) = self.source.stop() {
                eprintln!("whistled: failed to stop sample source: {}", e);
            }
            running.store(false, Ordering::SeqCst);
        });

        Ok((rx, handle))
    }
}

/// Handle to control a running block stream.
#[derive(Clone)]
pub struct BlockStreamHandle {
    running: Arc<AtomicBool>,
}

impl BlockStreamHandle {
    /// Stops block delivery.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Returns true while the stream is delivering blocks.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
