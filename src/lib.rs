//! whistled - pressure-cooker whistle counter
//!
//! Counts discrete whistle blasts from a live microphone (or a WAV file)
//! by comparing short-term RMS energy against an adaptive noise floor.
//! Hysteresis thresholds plus a hold-time debounce guarantee one count per
//! physical blast, however long it lasts.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

// L4 composition root - needs capture and CLI
#[cfg(all(feature = "cpal-audio", feature = "cli"))]
pub mod app;
pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod detect;
pub mod error;
pub mod output;
pub mod sink;

// Core types (source → detect → sink)
pub use audio::block::AudioBlock;
pub use audio::source::SampleSource;
pub use audio::stream::{BlockStream, BlockStreamConfig, BlockStreamHandle};
pub use detect::detector::{Detector, DetectorConfig};
pub use detect::types::{DetectorEvent, WhistleEvent};
pub use sink::{CollectorSink, ConsoleSink, EventSink};

// Config
pub use config::Config;

// Error handling
pub use error::{Result, WhistledError};

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
