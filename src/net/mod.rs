// SPDX-License-Identifier: MIT OR Apache-2.0

//! UDP socket helpers: bind, resolve, blocking/non-blocking mode,
//! receive-timeout, readiness poll.

pub mod io;

pub use io::{
    bind_server, ready_to_read, resolve_client, set_blocking, set_nonblocking, set_rcv_timeout,
};
