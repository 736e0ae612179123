//! Integration test common infrastructure.
//!
//! Provides a scripted event-socket backend and helpers for asserting on
//! exposition output.

pub mod switch;

#[allow(unused_imports)]
pub use switch::{ContentLengthMode, MockSwitch, SwitchEvent, SwitchScript, STATUS_FIXTURE};

/// Pull one sample value out of Prometheus text exposition output.
///
/// Matches whole metric names only: the line must continue with a space
/// after the name, so `freeswitch_up` does not match
/// `freeswitch_uptime_seconds`.
#[allow(dead_code)]
pub fn sample(text: &str, name: &str) -> Option<f64> {
    text.lines().find_map(|line| {
        let rest = line.strip_prefix(name)?;
        let rest = rest.strip_prefix(' ')?;
        rest.parse().ok()
    })
}
