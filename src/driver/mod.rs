// SPDX-License-Identifier: MIT OR Apache-2.0

//! The state machine and concurrency core: server accept loop, client
//! connect loop, periodic sender, async receiver, shutdown.
//!
//! Each mode is a sequence of explicit named states, each with one
//! blocking operation and one set of valid transitions, rather than a
//! single tangled loop handling every case inline.

pub mod client;
pub mod receiver;
pub mod server;

use std::{net::SocketAddr, sync::Arc};

pub use client::run_client;
pub use server::run_server;

use crate::{
    cfg::config::AdapterConfig,
    clock,
    codec::{data, header::MessageType, simple},
    context::{Context, RuntimeState},
    error::{SendError, SessionFatal},
    session::{LocalEndpoint, RemoteEndpoint},
};

/// Above this wall-clock/simulation-clock offset (ms), the driver records
/// `time_diff` for the application to use.
pub const MAX_TIME_DIFF_MS: i64 = 1000;

/// Tick granularity used while sleeping through an `interval_ms` so that
/// `stop_local` / `remote.stop_flag` are noticed promptly instead of only
/// at the end of a (possibly long) interval.
pub(crate) const STOP_POLL_TICK_MS: i64 = 50;

/// Updates `runtime.time_diff` from a peer's reported simulation time:
/// only stored when the offset exceeds [`MAX_TIME_DIFF_MS`]; otherwise
/// the previous value (0 until first negotiated) is left alone.
pub(crate) fn negotiate_time_diff(peer_sim_ms: i64, runtime: &RuntimeState) {
    let diff = clock::epoch_ms() - peer_sim_ms;
    if diff.abs() > MAX_TIME_DIFF_MS {
        runtime.set_time_diff(diff);
    }
}

/// Sleeps up to `total_ms`, waking every [`STOP_POLL_TICK_MS`] to check
/// whether the session or the whole driver has been asked to stop.
pub(crate) fn sleep_with_stop_poll(total_ms: i64, runtime: &RuntimeState, remote: &RemoteEndpoint) {
    let mut remaining = total_ms;
    while remaining > 0 {
        if runtime.should_stop() || remote.is_stopped() {
            return;
        }
        let tick = remaining.min(STOP_POLL_TICK_MS);
        clock::sleep_ms(tick);
        remaining -= tick;
    }
}

/// Builds and sends one DATA message via `context.write_data`. Returns
/// `Ok(true)` if a message was sent, `Ok(false)` if the application
/// signalled "no data this tick", and a [`SendError`] if `sendto` failed.
fn send_data_tick(
    local: &mut LocalEndpoint,
    remote: &RemoteEndpoint,
    context: &Arc<dyn Context>,
) -> Result<bool, SendError> {
    let payload_start = data::begin_write_data(&mut local.scratch, local.assigned_id);
    let Some(payload_end) = context.write_data(&mut local.scratch, payload_start) else {
        return Ok(false);
    };
    let total = data::end_write_data(&mut local.scratch, payload_end);
    local.socket.send_to(&local.scratch.as_slice()[..total], remote.addr).map_err(SendError)?;
    Ok(true)
}

fn send_stop(local: &mut LocalEndpoint, remote: &RemoteEndpoint) -> Result<(), SendError> {
    let total = simple::write_simple(&mut local.scratch, MessageType::Stop, local.assigned_id);
    local.socket.send_to(&local.scratch.as_slice()[..total], remote.addr).map_err(SendError)?;
    Ok(())
}

/// Runs the **Connected** / **Draining** states shared verbatim by server
/// and client mode: starts the receiver thread, ticks the periodic sender
/// at `local.interval_ms`, and on exit sends a final DATA + STOP
/// best-effort before joining the receiver.
pub(crate) fn run_connected(
    local: &mut LocalEndpoint,
    remote: &Arc<RemoteEndpoint>,
    context: &Arc<dyn Context>,
    runtime: &Arc<RuntimeState>,
    cfg: &AdapterConfig,
) {
    let receiver_socket = match local.socket.try_clone() {
        Ok(s) => s,
        Err(e) => {
            context.error(&format!("failed to clone socket for receiver thread: {e}"));
            return;
        }
    };
    // Short timeout so the receiver periodically rechecks the stop flags
    // instead of blocking in `recvfrom` forever.
    let _ = crate::net::io::set_rcv_timeout(&receiver_socket, STOP_POLL_TICK_MS as u64 * 2);

    let handle = receiver::spawn(
        receiver_socket,
        Arc::clone(remote),
        Arc::clone(context),
        Arc::clone(runtime),
        cfg.max_msg_len,
    );

    loop {
        if remote.is_stopped() || runtime.should_stop() {
            break;
        }
        if let Err(e) = send_data_tick(local, remote, context) {
            let fatal = SessionFatal::from(e);
            context.error(&format!("{fatal}, ending session"));
            break;
        }
        sleep_with_stop_poll(local.interval_ms as i64, runtime, remote);
    }

    // Draining: cooperative shutdown sends one last DATA then STOP so the
    // peer's final observation matches the application's last state.
    if runtime.should_stop() && !remote.is_stopped() {
        let _ = send_data_tick(local, remote, context);
        let _ = send_stop(local, remote);
    }

    remote.set_stopped();
    if let Err(e) = handle.join() {
        context.error(&format!("receiver thread panicked: {e:?}"));
    }
}

pub(crate) fn split_host_service(addr: SocketAddr) -> (String, String) {
    (addr.ip().to_string(), addr.port().to_string())
}
