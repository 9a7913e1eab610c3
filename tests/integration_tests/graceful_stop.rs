// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stop_local` is set on the server during `Connected`. The server
//! sends one final DATA then STOP; the client observes STOP
//! and its own session loop exits (without ever setting its own
//! `stop_local`); the server returns to `WaitRequest`.

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
fn server_initiated_stop_ends_the_client_session_without_local_stop() {
    let server_port = free_port();
    let client_bind_port = free_port();

    let server_cfg = base_config(server_port, 0);
    let client_cfg = base_config(server_port, client_bind_port);

    let (server_tx, server_rx) = mpsc::channel();
    let (client_tx, client_rx) = mpsc::channel();

    let server_runtime = Arc::new(RuntimeState::new());
    let client_runtime = Arc::new(RuntimeState::new());

    let server_ctx = Arc::new(RecordingContext::new(server_tx));
    let client_ctx = Arc::new(RecordingContext::new(client_tx));

    let server_runtime_for_thread = server_runtime.clone();
    let server_handle =
        thread::spawn(move || run_server(&server_cfg, server_ctx, server_runtime_for_thread));

    thread::sleep(Duration::from_millis(50));

    // The client's own runtime is never asked to stop in this test — only
    // the server-initiated STOP should end its session.
    let client_runtime_for_thread = client_runtime.clone();
    let client_handle =
        thread::spawn(move || run_client(&client_cfg, client_ctx, client_runtime_for_thread));

    let client_event = client_rx.recv_timeout(Duration::from_secs(2)).expect("client connected");
    assert!(matches!(client_event, Event::Started(_)));
    let server_event = server_rx.recv_timeout(Duration::from_secs(2)).expect("server connected");
    assert!(matches!(server_event, Event::Started(_)));

    // Ask only the server to stop; it must send a final DATA then STOP
    // before tearing its session down and looping back to WaitRequest.
    server_runtime.request_stop();

    let mut client_terminated = false;
    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while std::time::Instant::now() < deadline && !client_terminated {
        if let Ok(Event::Terminated) = client_rx.recv_timeout(Duration::from_millis(300)) {
            client_terminated = true;
        }
    }
    assert!(client_terminated, "client never observed the server's STOP");

    let client_ok = client_handle.join().expect("client thread panicked").expect("client error");
    assert!(client_ok, "client session should end cleanly on peer STOP, not an error");

    // The server's own loop exits once it notices the same `stop_local`
    // request, after its Draining step for this session has completed.
    let server_ok = server_handle.join().expect("server thread panicked").expect("server error");
    assert!(server_ok);
}
