// SPDX-License-Identifier: MIT OR Apache-2.0

//! The assigned client id is strictly positive and strictly increasing
//! across successive sessions of a server. Connects
//! two clients to the same long-lived server, one after the other, and
//! checks the ids the server hands out.

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
fn successive_sessions_get_strictly_increasing_ids() {
    let server_port = free_port();

    let server_cfg = base_config(server_port, 0);
    let (server_tx, server_rx) = mpsc::channel();
    let server_runtime = Arc::new(RuntimeState::new());
    let server_ctx = Arc::new(RecordingContext::new(server_tx));

    let server_runtime_for_thread = server_runtime.clone();
    let server_handle =
        thread::spawn(move || run_server(&server_cfg, server_ctx, server_runtime_for_thread));

    thread::sleep(Duration::from_millis(50));

    // First client connects, observes its session, then stops.
    let first_bind_port = free_port();
    let first_cfg = base_config(server_port, first_bind_port);
    let (first_tx, first_rx) = mpsc::channel();
    let first_runtime = Arc::new(RuntimeState::new());
    let first_ctx = Arc::new(RecordingContext::new(first_tx));
    let first_runtime_for_thread = first_runtime.clone();
    let first_handle =
        thread::spawn(move || run_client(&first_cfg, first_ctx, first_runtime_for_thread));

    let first_server_id = match server_rx.recv_timeout(Duration::from_secs(2)).expect("first session") {
        Event::Started(id) => id,
        other => panic!("expected Started, got {other:?}"),
    };
    first_rx.recv_timeout(Duration::from_secs(2)).expect("first client observed Started");

    first_runtime.request_stop();
    first_handle.join().expect("first client thread panicked").expect("first client error");

    // Give the server a moment to notice the first session's STOP and
    // loop back to WaitRequest before the second client's REQUEST arrives
    // (a REQUEST sent while the server is still in Connected for the
    // first session would otherwise just be silently dropped).
    thread::sleep(Duration::from_millis(200));

    // Second, independent client connects after the first has fully
    // disconnected; the server must hand out a strictly larger id.
    let second_bind_port = free_port();
    let second_cfg = base_config(server_port, second_bind_port);
    let (second_tx, second_rx) = mpsc::channel();
    let second_runtime = Arc::new(RuntimeState::new());
    let second_ctx = Arc::new(RecordingContext::new(second_tx));
    let second_runtime_for_thread = second_runtime.clone();
    let second_handle =
        thread::spawn(move || run_client(&second_cfg, second_ctx, second_runtime_for_thread));

    let second_server_id =
        match server_rx.recv_timeout(Duration::from_secs(2)).expect("second session") {
            Event::Started(id) => id,
            other => panic!("expected Started, got {other:?}"),
        };
    second_rx.recv_timeout(Duration::from_secs(2)).expect("second client observed Started");

    second_runtime.request_stop();
    second_handle.join().expect("second client thread panicked").expect("second client error");

    server_runtime.request_stop();
    let server_ok = server_handle.join().expect("server thread panicked").expect("server error");
    assert!(server_ok);

    assert!(first_server_id > 0, "assigned ids must be strictly positive");
    assert!(second_server_id > first_server_id, "ids must strictly increase across sessions");
}
