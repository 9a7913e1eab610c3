// SPDX-License-Identifier: MIT OR Apache-2.0

//! The callback surface the driver consumes, expressed as a single trait
//! with required methods for the mandatory callbacks and no-op defaults
//! for the optional hooks, so an application only implements what it
//! actually cares about.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use crate::{
    codec::flags::{CapabilityFlags, RejectReason},
    databuf::DataBuf,
};

/// Application callback surface for one adapter session.
///
/// Implementors supply the four required methods; the optional lifecycle
/// and logging hooks default to no-ops so an application only overrides
/// what it cares about.
pub trait Context: Send + Sync {
    /// Client only: populate the REQUEST body after the header, starting
    /// at `pos`. Returns the new cursor position.
    fn write_request(&self, buf: &mut DataBuf, pos: usize) -> usize;

    /// Server only: authorize an incoming REQUEST. May adjust `sim_ms`
    /// and `interval_ms` in place (the server's preferred values);
    /// returns the reject bitmask (`RejectReason::empty()` means accept).
    fn check_request(
        &self,
        peer_host: &str,
        peer_service: &str,
        flags: CapabilityFlags,
        schema: &str,
        sim_ms: &mut i64,
        interval_ms: &mut i32,
    ) -> RejectReason;

    /// Fills the outgoing DATA payload starting at `pos`. Returns
    /// `Some(new_pos)`, or `None` to signal "no data this tick" (the
    /// driver skips sending a DATA message for that interval).
    fn write_data(&self, buf: &mut DataBuf, pos: usize) -> Option<usize>;

    /// Consumes the incoming DATA payload starting at `pos`. Returns the
    /// new cursor position.
    fn read_data(&self, buf: &DataBuf, pos: usize) -> usize;

    /// Called once a session reaches `Connected`, with the peer's
    /// assigned id.
    fn connection_started(&self, _remote_id: i32) {}

    /// Called when a PAUSE is received for the current session.
    fn connection_paused(&self) {}

    /// Called when a RESUME is received for the current session.
    fn connection_resumed(&self) {}

    /// Called once the session ends, on every exit path (STOP, local
    /// shutdown, or a session-fatal error).
    fn connection_terminated(&self) {}

    fn info(&self, _message: &str) {}
    fn warning(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Shared state touched by both the driver and receiver threads:
/// `stop_local` and `time_diff`. Kept out of the `Context` trait itself
/// since they're plain shared state, not application behavior — a
/// `Context` implementor never touches them directly, only the driver and
/// receiver thread do.
#[derive(Debug, Default)]
pub struct RuntimeState {
    stop_local: AtomicBool,
    time_diff: AtomicI64,
}

impl RuntimeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a graceful shutdown. Safe to call from any thread,
    /// including a signal handler.
    pub fn request_stop(&self) {
        self.stop_local.store(true, Ordering::Release);
    }

    pub fn should_stop(&self) -> bool {
        self.stop_local.load(Ordering::Acquire)
    }

    pub fn time_diff(&self) -> i64 {
        self.time_diff.load(Ordering::Acquire)
    }

    /// Written by the driver thread before the receiver thread starts and
    /// afterward only by the driver, so plain acquire/release orders it
    /// correctly across the thread start/join fence.
    pub fn set_time_diff(&self, diff: i64) {
        self.time_diff.store(diff, Ordering::Release);
    }
}
