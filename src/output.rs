//! Terminal rendering for detection events.
//!
//! Formatting is split from printing so tests can assert on the exact
//! lines without capturing stdout.

use crate::detect::types::DetectorEvent;

const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Format one detection event as a console line (without trailing newline).
///
/// Verbosity >= 1 appends the energy/floor pair that triggered the open,
/// which is the number you stare at while tuning `--rise` and `--fall`.
pub fn format_event(event: &DetectorEvent, verbosity: u8) -> String {
    match event {
        DetectorEvent::WhistleStart { at, energy, floor } => {
            if verbosity >= 1 {
                format!(
                    "[{:6.2}s] Whistle start  {DIM}(energy {:.4}, floor {:.4}){RESET}",
                    at, energy, floor
                )
            } else {
                format!("[{:6.2}s] Whistle start", at)
            }
        }
        DetectorEvent::WhistleEnd(end) if end.accepted => {
            format!(
                "[{:6.2}s] {GREEN}Whistle #{}{RESET}  duration {:.2}s",
                end.end_time, end.count, end.duration
            )
        }
        DetectorEvent::WhistleEnd(end) => {
            format!(
                "[{:6.2}s] {YELLOW}Ignored whistle{RESET} ({:.2}s out of range)",
                end.end_time, end.duration
            )
        }
    }
}

/// Format the shutdown summary line.
pub fn format_summary(accepted: u32) -> String {
    format!("Stopped. Total whistles counted: {}", accepted)
}

/// Print one detection event.
pub fn render_event(event: &DetectorEvent, verbosity: u8) {
    println!("{}", format_event(event, verbosity));
}

/// Print the shutdown summary.
pub fn render_summary(accepted: u32) {
    println!("{}", format_summary(accepted));
}
