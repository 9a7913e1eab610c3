// SPDX-License-Identifier: MIT OR Apache-2.0

//! Millisecond epoch time source, interruptible sleep, and simulation-time
//! offset tracking.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Current wall-clock time, milliseconds since the Unix epoch.
pub fn epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Blocking sleep for `ms` milliseconds.
///
/// Implemented as a single `thread::sleep`: on all supported platforms this
/// is already interrupted by process signals delivered to the sleeping
/// thread (the OS call returns early), which is what lets
/// [`crate::context::stop_local`] take effect promptly even while a sender
/// tick is sleeping. Callers that need sub-tick responsiveness to
/// `stop_local` poll it in a short loop instead of sleeping the whole
/// interval at once; see `driver::server` and `driver::client`.
pub fn sleep_ms(ms: i64) {
    if ms <= 0 {
        return;
    }
    std::thread::sleep(Duration::from_millis(ms as u64));
}

/// Converts a fractional-seconds duration (as used by some upstream
/// configuration formats) into whole milliseconds.
pub fn from_fractional_seconds(sec: f64) -> i64 {
    (sec * 1000.0).round() as i64
}
