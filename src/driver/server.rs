// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server mode: **Idle → WaitRequest → Handshake → Connected → Draining →
//! Idle** (loop), exiting to **Terminated** once `runtime.should_stop()`.

use std::sync::Arc;

use crate::{
    cfg::config::AdapterConfig,
    clock,
    codec::{
        accept::{self, AcceptBody},
        header::SENDER_SERVER,
        reject, request,
    },
    context::{Context, RuntimeState},
    databuf::DataBuf,
    driver::{self, split_host_service},
    error::DriverFatal,
    net::io,
    session::{LocalEndpoint, RemoteEndpoint},
};

/// Blocking; returns once `runtime.should_stop()` (clean shutdown) or a
/// driver-fatal error occurs.
pub fn run_server(
    cfg: &AdapterConfig,
    context: Arc<dyn Context>,
    runtime: Arc<RuntimeState>,
) -> Result<bool, DriverFatal> {
    let socket = io::bind_server(cfg.port)?;
    io::set_blocking(&socket);
    // WaitRequest's recvfrom needs to return periodically so stop_local
    // can be noticed at this suspension boundary without a socket close
    // from another thread.
    let _ = io::set_rcv_timeout(&socket, driver::STOP_POLL_TICK_MS as u64 * 2);
    context.info(&format!("server listening on port {}", cfg.port));

    let mut local = LocalEndpoint::new(socket, cfg.max_msg_len);
    // Strictly increasing across sessions of this server run.
    let mut next_client_id: i32 = 1;

    while !runtime.should_stop() {
        let mut inbound = vec![0u8; cfg.max_msg_len];
        let (n, peer_addr) = match local.socket.recv_from(&mut inbound) {
            Ok(pair) => pair,
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                ) =>
            {
                continue;
            }
            Err(_) if runtime.should_stop() => break,
            Err(e) => {
                context.error(&format!("recvfrom failed while idle: {e}"));
                continue;
            }
        };

        let mut buf = DataBuf::from_vec(inbound);
        if !request::is_request(&buf, n) {
            context.warning("dropping non-REQUEST datagram while idle");
            continue;
        }
        let (_hdr, body) = match request::read_request(&mut buf, n) {
            Ok(pair) => pair,
            Err(e) => {
                context.warning(&format!("malformed REQUEST: {e}"));
                continue;
            }
        };

        let mut sim_ms = body.requested_sim_ms;
        let mut interval_ms = body.preferred_interval_ms;
        let (peer_host, peer_service) = split_host_service(peer_addr);
        let reject_mask = context.check_request(
            &peer_host,
            &peer_service,
            body.flags,
            &body.schema,
            &mut sim_ms,
            &mut interval_ms,
        );

        if !reject_mask.is_empty() {
            let total = reject::write_reject(&mut local.scratch, SENDER_SERVER, reject_mask);
            if let Err(e) = local.socket.send_to(&local.scratch.as_slice()[..total], peer_addr) {
                context.warning(&format!("failed to send REJECT: {e}"));
            }
            continue;
        }

        driver::negotiate_time_diff(sim_ms, &runtime);

        let client_id = next_client_id;
        next_client_id += 1;
        local.assigned_id = SENDER_SERVER;
        local.interval_ms = interval_ms;

        let accept_body = AcceptBody {
            flags: cfg.capability_flags(),
            server_sim_ms: sim_ms,
            chosen_interval_ms: interval_ms,
            assigned_client_id: client_id,
        };
        let total = accept::write_accept(&mut local.scratch, SENDER_SERVER, &accept_body);
        if let Err(e) = local.socket.send_to(&local.scratch.as_slice()[..total], peer_addr) {
            context.error(&format!("failed to send ACCEPT, dropping client: {e}"));
            continue;
        }

        let remote = Arc::new(RemoteEndpoint::new(peer_addr, client_id, clock::epoch_ms()));
        context.connection_started(client_id);

        driver::run_connected(&mut local, &remote, &context, &runtime, cfg);

        context.connection_terminated();
    }

    Ok(true)
}
