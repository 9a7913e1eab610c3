// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy, per the propagation policy: driver-fatal errors abort
//! the entry point, session-fatal errors tear the session down, and
//! per-datagram errors are logged and dropped without changing state.

use thiserror::Error;

/// Errors fatal to a `run_server`/`run_client` call as a whole.
#[derive(Debug, Error)]
pub enum DriverFatal {
    #[error("bind error: {0}")]
    Bind(#[from] BindError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("handshake error: {0}")]
    Handshake(#[from] HandshakeError),
}

#[derive(Debug, Error)]
#[error("failed to bind UDP socket on port {port}: {source}")]
pub struct BindError {
    pub port: u16,
    #[source]
    pub source: std::io::Error,
}

#[derive(Debug, Error)]
#[error("failed to resolve {host}:{service}: {source}")]
pub struct ResolveError {
    pub host: String,
    pub service: String,
    #[source]
    pub source: std::io::Error,
}

/// REQUEST malformed, REJECT received, or ACCEPT timed out past the retry
/// budget.
#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("malformed REQUEST: {0}")]
    MalformedRequest(String),

    #[error("peer rejected connection, reason bitmask 0x{0:x}")]
    Rejected(u32),

    #[error("timed out waiting for ACCEPT")]
    AcceptTimeout,
}

/// Ends the current session; the server loops to await the next peer, the
/// client exits (or retries per `connect_interval_ms`).
#[derive(Debug, Error)]
pub enum SessionFatal {
    #[error("send error: {0}")]
    Send(#[from] SendError),

    #[error("receive error: {0}")]
    Receive(#[from] ReceiveError),
}

#[derive(Debug, Error)]
#[error("sendto failed: {0}")]
pub struct SendError(#[from] pub std::io::Error);

#[derive(Debug, Error)]
#[error("recvfrom failed: {0}")]
pub struct ReceiveError(#[from] pub std::io::Error);

/// Per-datagram, recoverable: logged via the `warning` context hook, the
/// offending datagram is dropped, the session continues unchanged.
#[derive(Debug, Error)]
pub enum FramingError {
    #[error("unknown message type {0}")]
    UnknownType(i16),

    #[error("header length mismatch: header says {declared}, datagram was {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("truncated datagram: need at least {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },
}

/// Per-datagram, recoverable: DATA with an older timestamp or the wrong
/// sender id.
#[derive(Debug, Error)]
pub enum OrderingError {
    #[error("DATA sender id {got} does not match remote id {expected}")]
    WrongSender { expected: i32, got: i32 },

    #[error("DATA timestamp {got} is older than last observed {last}")]
    OutOfOrder { last: i64, got: i64 },
}
