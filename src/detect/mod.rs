//! Energy-envelope whistle detection core.
//!
//! Pure data-in/data-out: blocks of samples go in, detection events come
//! out. No I/O, no clocks — time is whatever the block timestamps say.

pub mod detector;
pub mod energy;
pub mod noise_floor;
pub mod state_machine;
pub mod types;

pub use detector::{Detector, DetectorConfig};
pub use types::{DetectorEvent, WhistleEvent};
