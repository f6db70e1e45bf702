//! Default configuration constants for whistled.
//!
//! Shared across config types and the CLI so the two surfaces can never
//! disagree about what "default" means.

/// Default audio sample rate in Hz.
///
/// Whistle energy lives well below 8kHz, so 16kHz capture is plenty and
/// keeps per-block work small.
pub const SAMPLE_RATE: u32 = 16000;

/// Default samples per processing block.
///
/// 1024 samples at 16kHz is 64ms per block — fine enough to time whistle
/// edges, coarse enough that the per-block cost is negligible.
pub const BLOCK_SIZE: usize = 1024;

/// Default minimum accepted whistle length in seconds.
///
/// Shorter bursts (clanks, taps, speech plosives) are reported but not
/// counted.
pub const MIN_WHISTLE_SECS: f64 = 1.0;

/// Default maximum accepted whistle length in seconds.
///
/// Anything longer is more likely a stuck appliance or steady machinery
/// than a discrete blast.
pub const MAX_WHISTLE_SECS: f64 = 15.0;

/// Default energy/noise-floor ratio that opens a whistle.
pub const RISE_MULTIPLIER: f32 = 6.0;

/// Default energy/noise-floor ratio below which a close candidate begins.
///
/// Must stay below [`RISE_MULTIPLIER`]: the gap between the two thresholds
/// is what prevents rapid toggling near a single boundary.
pub const FALL_MULTIPLIER: f32 = 3.0;

/// Default continuous quiet required to close a whistle, in seconds.
///
/// A whistle's tail often sputters; 400ms of sustained quiet distinguishes
/// "finished" from "catching its breath".
pub const HOLD_SECS: f64 = 0.4;

/// Default noise-floor smoothing factor (0–1).
///
/// 0.02 follows slow room changes (fans, rain) over tens of seconds while
/// barely moving during a single whistle.
pub const FLOOR_ALPHA: f32 = 0.02;

/// Default baseline-learning period at start, in seconds.
///
/// The floor adapts but detection stays off, so startup transients (chair
/// scrapes, the mic being plugged in) cannot fire false counts.
pub const WARMUP_SECS: f64 = 1.0;

/// Epsilon added under the root in the energy computation.
///
/// Keeps the energy of digital silence strictly positive, which keeps the
/// seeded noise floor away from zero and every threshold ratio meaningful.
pub const ENERGY_EPSILON: f64 = 1e-12;

/// Blocks buffered between the capture thread and the detection task.
///
/// 64 blocks is ~4s at the default rate — enough slack for a stalled
/// terminal without hiding a wedged consumer forever.
pub const CHANNEL_BUFFER_SIZE: usize = 64;

/// Polling interval when the sample source has nothing new, in ms.
pub const POLL_INTERVAL_MS: u64 = 10;
