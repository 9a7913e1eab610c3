// SPDX-License-Identifier: MIT OR Apache-2.0

//! The receiver thread: owns its own stack-sized inbound buffer,
//! dispatches STOP/DATA/PAUSE/RESUME, and never touches the driver's
//! scratch buffer or `last_send_time` from the driver side.

use std::{
    io::ErrorKind,
    net::UdpSocket,
    sync::Arc,
    thread::{self, JoinHandle},
};

use crate::{
    codec::{
        data, header::MessageType, simple,
    },
    context::{Context, RuntimeState},
    databuf::DataBuf,
    error::{OrderingError, ReceiveError},
    session::RemoteEndpoint,
};

/// Spawns the receiver thread. `socket` must already have a short receive
/// timeout set so the loop can recheck `runtime`/`remote` stop flags
/// instead of blocking in `recvfrom` indefinitely.
pub fn spawn(
    socket: UdpSocket,
    remote: Arc<RemoteEndpoint>,
    context: Arc<dyn Context>,
    runtime: Arc<RuntimeState>,
    max_msg_len: usize,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("simlink-receiver".to_string())
        .spawn(move || receive_loop(socket, remote, context, runtime, max_msg_len))
        .expect("spawn receiver thread")
}

fn receive_loop(
    socket: UdpSocket,
    remote: Arc<RemoteEndpoint>,
    context: Arc<dyn Context>,
    runtime: Arc<RuntimeState>,
    max_msg_len: usize,
) {
    let mut inbound = vec![0u8; max_msg_len];
    loop {
        if runtime.should_stop() || remote.is_stopped() {
            return;
        }
        match socket.recv_from(&mut inbound) {
            Ok((n, from)) => {
                if from != remote.addr {
                    context.warning(&format!("dropping datagram from unexpected peer {from}"));
                    continue;
                }
                let buf = DataBuf::from_vec(inbound.clone());
                dispatch(&buf, n, &remote, &context);
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => continue,
            Err(e) => {
                context.error(&format!("{}", ReceiveError(e)));
                return;
            }
        }
    }
}

/// Handles one datagram already known to be `n` bytes long: STOP, DATA,
/// PAUSE, RESUME, or an unrecognized type, each dispatched to the
/// matching `RemoteEndpoint`/`Context` action.
fn dispatch(buf: &DataBuf, n: usize, remote: &RemoteEndpoint, context: &Arc<dyn Context>) {
    if simple::is_stop(buf, n) {
        if let Ok(hdr) = simple::read_simple(buf, MessageType::Stop, n)
            && hdr.sender_id == remote.id
        {
            remote.set_stopped();
        }
        return;
    }

    if data::is_data(buf, n) {
        match data::read_data_header(buf, n) {
            Ok((hdr, payload_pos)) => {
                if hdr.sender_id != remote.id {
                    let err = OrderingError::WrongSender { expected: remote.id, got: hdr.sender_id };
                    context.warning(&format!("dropping DATA: {err}"));
                    return;
                }
                if hdr.timestamp_ms < remote.last_send_time() {
                    let err = OrderingError::OutOfOrder {
                        last: remote.last_send_time(),
                        got: hdr.timestamp_ms,
                    };
                    context.warning(&format!("dropping out-of-order DATA: {err}"));
                    return;
                }
                remote.set_last_send_time(hdr.timestamp_ms);
                context.read_data(buf, payload_pos);
            }
            Err(e) => context.warning(&format!("dropping malformed DATA: {e}")),
        }
        return;
    }

    if simple::is_pause(buf, n) {
        if let Ok(hdr) = simple::read_simple(buf, MessageType::Pause, n)
            && hdr.sender_id == remote.id
        {
            context.connection_paused();
        }
        return;
    }

    if simple::is_resume(buf, n) {
        if let Ok(hdr) = simple::read_simple(buf, MessageType::Resume, n)
            && hdr.sender_id == remote.id
        {
            context.connection_resumed();
        }
        return;
    }

    context.warning("dropping unrecognized message type");
}
