// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability and reject-reason bitmasks, defined via `bitflags!` and
//! carried over the wire as plain `i32` values.

use bitflags::bitflags;

bitflags! {
    /// Capability flags exchanged in REQUEST/ACCEPT. Other bits are
    /// reserved and must round-trip unchanged even when this crate doesn't
    /// interpret them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CapabilityFlags: i32 {
        /// Peer produces DATA (sender).
        const PRODUCES_DATA = 1 << 0;
        /// Peer consumes DATA (receiver).
        const CONSUMES_DATA = 1 << 1;
    }
}

bitflags! {
    /// Reject reason bitmask. A server may OR multiple reasons into one
    /// REJECT; `empty()` is the accept case.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RejectReason: i32 {
        const NO_MORE_CONNECTIONS = 1 << 0;
        const UNKNOWN_DATA_SCHEMA = 1 << 1;
        const UNSUPPORTED_INTERVAL = 1 << 2;
    }
}
