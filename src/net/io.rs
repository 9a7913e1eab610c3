// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{
    net::{SocketAddr, ToSocketAddrs, UdpSocket},
    time::Duration,
};

use crate::error::{BindError, ResolveError};

/// Opens a UDP socket and binds it to the any-address on `port`. Used by
/// the server to listen, and by the client to bind its own local port
/// before sending REQUEST.
pub fn bind_server(port: u16) -> Result<UdpSocket, BindError> {
    UdpSocket::bind(("0.0.0.0", port)).map_err(|source| BindError { port, source })
}

/// Resolves `host:service` and returns the first usable UDP address.
pub fn resolve_client(host: &str, service: &str) -> Result<SocketAddr, ResolveError> {
    let err = |source: std::io::Error| ResolveError {
        host: host.to_string(),
        service: service.to_string(),
        source,
    };
    (host, service.parse::<u16>().map_err(|_| {
        err(std::io::Error::new(std::io::ErrorKind::InvalidInput, "bad port"))
    })?)
        .to_socket_addrs()
        .map_err(err)?
        .next()
        .ok_or_else(|| {
            err(std::io::Error::new(std::io::ErrorKind::NotFound, "no address resolved"))
        })
}

pub fn set_blocking(socket: &UdpSocket) -> bool {
    socket.set_nonblocking(false).is_ok()
}

pub fn set_nonblocking(socket: &UdpSocket) -> bool {
    socket.set_nonblocking(true).is_ok()
}

pub fn set_rcv_timeout(socket: &UdpSocket, ms: u64) -> std::io::Result<()> {
    if ms == 0 {
        socket.set_read_timeout(None)
    } else {
        socket.set_read_timeout(Some(Duration::from_millis(ms)))
    }
}

/// Non-blocking readiness probe: `true` if a datagram is available to be
/// read without blocking. `std::net::UdpSocket` has no getter for its
/// current blocking mode, so this cannot restore "whatever it was before" —
/// it always leaves the socket in blocking mode when it returns, whether or
/// not it was blocking on entry. Callers that need non-blocking mode across
/// a `ready_to_read` call must re-apply it afterwards.
pub fn ready_to_read(socket: &UdpSocket) -> bool {
    let flipped = set_nonblocking(socket);
    let mut scratch = [0u8; 1];
    let ready = match socket.peek_from(&mut scratch) {
        Ok(_) => true,
        Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => false,
        Err(_) => false,
    };
    if flipped {
        let _ = socket.set_nonblocking(false);
    }
    ready
}
