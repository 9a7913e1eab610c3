// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client mode: **Idle → Resolve → Request → AwaitResponse → Connected →
//! Draining → Terminated**.

use std::{sync::Arc, time::Duration};

use crate::{
    cfg::config::{AdapterConfig, RECV_TIMEOUT_MS},
    clock,
    codec::{
        accept, header::SENDER_UNASSIGNED, reject,
        request::{self, RequestBody},
    },
    context::{Context, RuntimeState},
    databuf::DataBuf,
    driver::{self, MAX_TIME_DIFF_MS},
    error::{DriverFatal, HandshakeError},
    net::io,
    session::{LocalEndpoint, RemoteEndpoint},
};

/// Blocking; returns once `runtime.should_stop()` or a driver-fatal error
/// occurs. With `connect_interval_ms == 0`, any single Resolve or
/// AwaitResponse failure is fatal rather than retried.
pub fn run_client(
    cfg: &AdapterConfig,
    context: Arc<dyn Context>,
    runtime: Arc<RuntimeState>,
) -> Result<bool, DriverFatal> {
    while !runtime.should_stop() {
        // Resolve
        let peer_addr = match io::resolve_client(&cfg.host, &cfg.port.to_string()) {
            Ok(addr) => addr,
            Err(e) => {
                if cfg.connect_interval_ms > 0 {
                    context.warning(&format!("resolve failed, retrying: {e}"));
                    retry_sleep(cfg.connect_interval_ms as i64, &runtime);
                    continue;
                }
                return Err(DriverFatal::from(e));
            }
        };

        let socket = io::bind_server(cfg.bind_port)?;
        let _ = io::set_rcv_timeout(&socket, RECV_TIMEOUT_MS);
        let mut local = LocalEndpoint::new(socket, cfg.max_msg_len);

        // Request
        let request_body = RequestBody {
            flags: cfg.capability_flags(),
            schema: cfg.schema.clone(),
            requested_sim_ms: clock::epoch_ms(),
            preferred_interval_ms: cfg.interval_ms,
        };
        let payload_after_header =
            request::write_request(&mut local.scratch, SENDER_UNASSIGNED, &request_body);
        let _ = context.write_request(&mut local.scratch, payload_after_header);

        match await_response(&mut local, peer_addr, cfg, &context, &runtime) {
            Ok(remote) => {
                io::set_rcv_timeout(&local.socket, 0).ok();
                context.connection_started(remote.id);
                let remote = Arc::new(remote);
                driver::run_connected(&mut local, &remote, &context, &runtime, cfg);
                context.connection_terminated();
                // Unlike the server, the client does not loop back for
                // another peer once Draining completes.
                return Ok(true);
            }
            Err(AwaitOutcome::Rejected(reason)) => {
                context.error(&format!("connection rejected, reason bitmask {reason:#x}"));
                return Err(HandshakeError::Rejected(reason).into());
            }
            Err(AwaitOutcome::TimedOut) => {
                if cfg.connect_interval_ms > 0 {
                    context.warning("ACCEPT timed out, retrying REQUEST");
                    retry_sleep(cfg.connect_interval_ms as i64, &runtime);
                    continue;
                }
                return Err(HandshakeError::AcceptTimeout.into());
            }
            Err(AwaitOutcome::Malformed(msg)) => {
                return Err(HandshakeError::MalformedRequest(msg).into());
            }
        }
    }

    Ok(true)
}

enum AwaitOutcome {
    Rejected(u32),
    TimedOut,
    Malformed(String),
}

/// AwaitResponse: blocks on `recvfrom` (with the receive timeout set by
/// the caller) for ACCEPT or REJECT.
fn await_response(
    local: &mut LocalEndpoint,
    peer_addr: std::net::SocketAddr,
    cfg: &AdapterConfig,
    context: &Arc<dyn Context>,
    runtime: &Arc<RuntimeState>,
) -> Result<RemoteEndpoint, AwaitOutcome> {
    let mut inbound = vec![0u8; cfg.max_msg_len];
    loop {
        if runtime.should_stop() {
            return Err(AwaitOutcome::TimedOut);
        }
        match local.socket.recv_from(&mut inbound) {
            Ok((n, from)) if from == peer_addr => {
                let buf = DataBuf::from_vec(inbound);
                if accept::is_accept(&buf, n) {
                    let (hdr, body) = accept::read_accept(&buf, n)
                        .map_err(|e| AwaitOutcome::Malformed(e.to_string()))?;
                    driver::negotiate_time_diff(body.server_sim_ms, runtime);
                    local.assigned_id = body.assigned_client_id;
                    local.interval_ms = body.chosen_interval_ms;
                    return Ok(RemoteEndpoint::new(
                        peer_addr,
                        hdr.sender_id,
                        clock::epoch_ms(),
                    ));
                }
                if reject::is_reject(&buf, n) {
                    let (_, reason) = reject::read_reject(&buf, n)
                        .map_err(|e| AwaitOutcome::Malformed(e.to_string()))?;
                    return Err(AwaitOutcome::Rejected(reason.bits() as u32));
                }
                context.warning("dropping unexpected message while awaiting ACCEPT");
                inbound = vec![0u8; cfg.max_msg_len];
            }
            Ok(_) => {
                // datagram from an unrelated source; ignore and keep waiting
                inbound = vec![0u8; cfg.max_msg_len];
            }
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                ) =>
            {
                return Err(AwaitOutcome::TimedOut);
            }
            Err(_) => return Err(AwaitOutcome::TimedOut),
        }
    }
}

fn retry_sleep(ms: i64, runtime: &RuntimeState) {
    let mut remaining = ms;
    const TICK: i64 = 50;
    while remaining > 0 {
        if runtime.should_stop() {
            return;
        }
        let tick = remaining.min(TICK);
        clock::sleep_ms(tick);
        remaining -= tick;
    }
}
