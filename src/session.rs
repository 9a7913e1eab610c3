// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-connection state. `LocalEndpoint` exists for the whole driver run;
//! `RemoteEndpoint` is created on successful handshake and destroyed on
//! STOP or fatal I/O error.
//!
//! Ownership is strict: `RemoteEndpoint` is exclusively owned by the
//! driver thread; the receiver thread only ever sees it through a shared
//! reference (`Arc`) whose lifetime is bounded by the driver's join of
//! that thread.

use std::{
    net::{SocketAddr, UdpSocket},
    sync::atomic::{AtomicBool, AtomicI64, Ordering},
};

use crate::databuf::DataBuf;

/// The driver's own socket, scratch buffer, and negotiated parameters.
/// Mutated only by the driver thread before the receiver starts and
/// after it's joined.
pub struct LocalEndpoint {
    pub socket: UdpSocket,
    pub scratch: DataBuf,
    pub interval_ms: i32,
    /// Own id: 0 for the server, server-assigned for the client, `-1`
    /// (unassigned) until a client has logged in.
    pub assigned_id: i32,
}

impl LocalEndpoint {
    pub fn new(socket: UdpSocket, max_msg_len: usize) -> Self {
        Self {
            socket,
            scratch: DataBuf::new(max_msg_len),
            interval_ms: 0,
            assigned_id: crate::codec::header::SENDER_UNASSIGNED,
        }
    }
}

/// The peer's address, assigned id, and per-session atomics shared with
/// the receiver thread.
pub struct RemoteEndpoint {
    pub addr: SocketAddr,
    pub id: i32,
    pub request_time_ms: i64,
    /// Written only by the receiver thread, read only by the receiver
    /// thread — the driver never touches it.
    pub last_send_time_ms: AtomicI64,
    /// Release-on-write, acquire-on-read; polled by the driver at every
    /// suspension boundary to notice a peer-initiated STOP.
    pub stop_flag: AtomicBool,
}

impl RemoteEndpoint {
    pub fn new(addr: SocketAddr, id: i32, request_time_ms: i64) -> Self {
        Self {
            addr,
            id,
            request_time_ms,
            last_send_time_ms: AtomicI64::new(i64::MIN),
            stop_flag: AtomicBool::new(false),
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Acquire)
    }

    pub fn set_stopped(&self) {
        self.stop_flag.store(true, Ordering::Release);
    }

    pub fn last_send_time(&self) -> i64 {
        self.last_send_time_ms.load(Ordering::Relaxed)
    }

    pub fn set_last_send_time(&self, ts: i64) {
        self.last_send_time_ms.store(ts, Ordering::Relaxed);
    }
}
