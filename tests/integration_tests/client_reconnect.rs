// SPDX-License-Identifier: MIT OR Apache-2.0

//! The server isn't running when the client starts. With
//! `connect_interval_ms > 0` the client's Resolve/Request loop
//! retries on that backoff until a server finally binds the port, at
//! which point the next REQUEST is accepted and the session proceeds
//! normally.

use std::{
    sync::{Arc, mpsc},
    thread,
    time::Duration,
};

use serial_test::serial;
use simlink_rs::{RuntimeState, run_client, run_server};

use super::common::{Event, RecordingContext, base_config, free_port};

#[test]
#[serial]
fn client_retries_until_the_server_starts_listening() {
    let server_port = free_port();
    let client_bind_port = free_port();

    let mut client_cfg = base_config(server_port, client_bind_port);
    // Short backoff so the test doesn't have to wait out a full-size
    // reconnect interval; the mechanism is the same either way.
    client_cfg.connect_interval_ms = 100;

    let (client_tx, client_rx) = mpsc::channel();
    let client_runtime = Arc::new(RuntimeState::new());
    let client_ctx = Arc::new(RecordingContext::new(client_tx));

    // Start the client first, with nothing listening on server_port yet.
    let client_runtime_for_thread = client_runtime.clone();
    let client_handle =
        thread::spawn(move || run_client(&client_cfg, client_ctx, client_runtime_for_thread));

    // Give the client a few retry cycles against the dead port before the
    // server exists at all.
    thread::sleep(Duration::from_millis(350));

    let server_cfg = base_config(server_port, 0);
    let (server_tx, server_rx) = mpsc::channel();
    let server_runtime = Arc::new(RuntimeState::new());
    let server_ctx = Arc::new(RecordingContext::new(server_tx));

    let server_runtime_for_thread = server_runtime.clone();
    let server_handle =
        thread::spawn(move || run_server(&server_cfg, server_ctx, server_runtime_for_thread));

    let client_event = client_rx.recv_timeout(Duration::from_secs(3)).expect("client connected");
    assert!(matches!(client_event, Event::Started(_)), "client must connect once server binds");

    let server_event = server_rx.recv_timeout(Duration::from_secs(3)).expect("server connected");
    assert!(matches!(server_event, Event::Started(_)));

    client_runtime.request_stop();
    server_runtime.request_stop();

    let client_ok = client_handle.join().expect("client thread panicked").expect("client error");
    let server_ok = server_handle.join().expect("server thread panicked").expect("server error");
    assert!(client_ok);
    assert!(server_ok);
}
