// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{
    net::UdpSocket,
    sync::{Mutex, mpsc},
};

use simlink_rs::{
    AdapterConfig, Context,
    clock,
    codec::flags::{CapabilityFlags, RejectReason},
    databuf::DataBuf,
};

/// Binds to an OS-assigned port, reads it back, and drops the socket —
/// good enough for serial integration tests that immediately rebind it.
pub fn free_port() -> u16 {
    UdpSocket::bind("127.0.0.1:0")
        .expect("bind ephemeral port")
        .local_addr()
        .expect("local addr")
        .port()
}

#[derive(Debug, Clone)]
pub enum Event {
    Started(i32),
    Paused,
    Resumed,
    Terminated,
    Warning(String),
    DataReceived(i64),
}

/// A `Context` that reports every lifecycle/log callback over a channel so
/// tests can assert on the sequence of events a real driver run produced.
pub struct RecordingContext {
    events: Mutex<mpsc::Sender<Event>>,
    reject_reason: RejectReason,
    server_interval_ms: Option<i32>,
    payload: Mutex<i64>,
}

impl RecordingContext {
    pub fn new(events: mpsc::Sender<Event>) -> Self {
        Self {
            events: Mutex::new(events),
            reject_reason: RejectReason::empty(),
            server_interval_ms: None,
            payload: Mutex::new(0),
        }
    }

    pub fn rejecting(events: mpsc::Sender<Event>, reason: RejectReason) -> Self {
        Self { reject_reason: reason, ..Self::new(events) }
    }

    pub fn with_server_interval(mut self, ms: i32) -> Self {
        self.server_interval_ms = Some(ms);
        self
    }

    fn emit(&self, event: Event) {
        let _ = self.events.lock().expect("events lock").send(event);
    }
}

impl Context for RecordingContext {
    fn write_request(&self, _buf: &mut DataBuf, pos: usize) -> usize {
        pos
    }

    fn check_request(
        &self,
        _peer_host: &str,
        _peer_service: &str,
        _flags: CapabilityFlags,
        _schema: &str,
        _sim_ms: &mut i64,
        interval_ms: &mut i32,
    ) -> RejectReason {
        if let Some(chosen) = self.server_interval_ms {
            *interval_ms = chosen;
        }
        self.reject_reason
    }

    fn write_data(&self, buf: &mut DataBuf, pos: usize) -> Option<usize> {
        let value = *self.payload.lock().expect("payload lock");
        Some(buf.write_i64(pos, value))
    }

    fn read_data(&self, buf: &DataBuf, pos: usize) -> usize {
        if let Some(v) = buf.peek_i64(pos) {
            *self.payload.lock().expect("payload lock") = v;
        }
        self.emit(Event::DataReceived(clock::epoch_ms()));
        pos
    }

    fn connection_started(&self, remote_id: i32) {
        self.emit(Event::Started(remote_id));
    }

    fn connection_paused(&self) {
        self.emit(Event::Paused);
    }

    fn connection_resumed(&self) {
        self.emit(Event::Resumed);
    }

    fn connection_terminated(&self) {
        self.emit(Event::Terminated);
    }

    fn warning(&self, message: &str) {
        self.emit(Event::Warning(message.to_string()));
    }
}

pub fn base_config(server_port: u16, client_bind_port: u16) -> AdapterConfig {
    AdapterConfig {
        host: "127.0.0.1".to_string(),
        port: server_port,
        bind_port: client_bind_port,
        schema: "demo".to_string(),
        flags: 0,
        interval_ms: 50,
        connect_interval_ms: 0,
        max_msg_len: 512,
    }
}
