//! Command-line interface for whistled
//!
//! Provides argument parsing using clap derive macros.

use crate::config::Config;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Count pressure-cooker whistles from the microphone
#[derive(Parser, Debug)]
#[command(
    name = "whistled",
    version,
    about = "Count pressure-cooker whistles from the microphone"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress per-event output (the final total is still printed)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: energy/floor detail on start lines)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Audio input device (e.g., pipewire)
    #[arg(long, value_name = "DEVICE")]
    pub device: Option<String>,

    /// Count whistles in a WAV file instead of listening to the microphone
    #[arg(long, value_name = "FILE")]
    pub wav: Option<PathBuf>,

    /// Sample rate (Hz)
    #[arg(long, value_name = "HZ")]
    pub rate: Option<u32>,

    /// Samples per processing block
    #[arg(long, value_name = "SAMPLES")]
    pub block: Option<usize>,

    /// Minimum whistle length to count (e.g., "1.0" or "800ms")
    #[arg(long, value_name = "DURATION", value_parser = parse_secs)]
    pub min: Option<f64>,

    /// Maximum whistle length to count
    #[arg(long, value_name = "DURATION", value_parser = parse_secs)]
    pub max: Option<f64>,

    /// Open a whistle when energy exceeds FACTOR x noise floor
    #[arg(long, value_name = "FACTOR")]
    pub rise: Option<f32>,

    /// Begin closing when energy drops below FACTOR x noise floor
    #[arg(long, value_name = "FACTOR")]
    pub fall: Option<f32>,

    /// Continuous quiet needed to close a whistle (e.g., "0.4" or "400ms")
    #[arg(long, value_name = "DURATION", value_parser = parse_secs)]
    pub hold: Option<f64>,

    /// Noise-floor smoothing factor (0-1)
    #[arg(long, value_name = "ALPHA")]
    pub alpha: Option<f32>,

    /// Baseline-learning period before detection starts
    #[arg(long, value_name = "DURATION", value_parser = parse_secs)]
    pub warmup: Option<f64>,
}

impl Cli {
    /// Fold CLI overrides into a file/default configuration.
    ///
    /// Precedence: CLI flag > config file > built-in default. Validation
    /// happens afterward on the merged result.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(d) = &self.device {
            config.audio.device = Some(d.clone());
        }
        if let Some(rate) = self.rate {
            config.audio.sample_rate = rate;
        }
        if let Some(block) = self.block {
            config.audio.block_size = block;
        }
        if let Some(min) = self.min {
            config.detector.min_duration_secs = min;
        }
        if let Some(max) = self.max {
            config.detector.max_duration_secs = max;
        }
        if let Some(rise) = self.rise {
            config.detector.rise_multiplier = rise;
        }
        if let Some(fall) = self.fall {
            config.detector.fall_multiplier = fall;
        }
        if let Some(hold) = self.hold {
            config.detector.hold_secs = hold;
        }
        if let Some(alpha) = self.alpha {
            config.detector.alpha = alpha;
        }
        if let Some(warmup) = self.warmup {
            config.detector.warmup_secs = warmup;
        }
    }
}

/// Parse a duration flag into seconds.
///
/// Supports bare numbers (seconds, fractional allowed) and any format
/// accepted by `humantime`: single-unit (`400ms`, `2s`) and compound
/// (`1m30s`).
fn parse_secs(s: &str) -> Result<f64, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<f64>() {
        return Ok(secs);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_secs_f64())
        .map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available audio input devices
    Devices,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
