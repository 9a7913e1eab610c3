// SPDX-License-Identifier: MIT OR Apache-2.0

//! The server's `check_request` overrides the client's preferred
//! interval, and both peers end up ticking at the chosen rate.

use std::{
    sync::{Arc, mpsc},
    thread,
    time::{Duration, Instant},
};

use serial_test::serial;
use simlink_rs::{RuntimeState, run_client, run_server};

use super::common::{Event, RecordingContext, base_config, free_port};

#[test]
#[serial]
fn server_chosen_interval_overrides_client_preference() {
    let server_port = free_port();
    let client_bind_port = free_port();

    let server_cfg = base_config(server_port, 0);
    let mut client_cfg = base_config(server_port, client_bind_port);
    client_cfg.interval_ms = 100;

    const CHOSEN_INTERVAL_MS: i32 = 400;

    let (server_tx, _server_rx) = mpsc::channel();
    let (client_tx, client_rx) = mpsc::channel();

    let server_runtime = Arc::new(RuntimeState::new());
    let client_runtime = Arc::new(RuntimeState::new());

    let server_ctx =
        Arc::new(RecordingContext::new(server_tx).with_server_interval(CHOSEN_INTERVAL_MS));
    let client_ctx = Arc::new(RecordingContext::new(client_tx));

    let server_runtime_for_thread = server_runtime.clone();
    let server_handle =
        thread::spawn(move || run_server(&server_cfg, server_ctx, server_runtime_for_thread));

    thread::sleep(Duration::from_millis(50));

    let client_runtime_for_thread = client_runtime.clone();
    let client_handle =
        thread::spawn(move || run_client(&client_cfg, client_ctx, client_runtime_for_thread));

    // Wait for the connection, then collect two consecutive DATA arrivals
    // on the client side and measure the gap between them.
    let mut started = false;
    let mut first_data_at: Option<Instant> = None;
    let deadline = Instant::now() + Duration::from_secs(3);
    let mut gap = None;
    while Instant::now() < deadline && gap.is_none() {
        match client_rx.recv_timeout(Duration::from_millis(500)) {
            Ok(Event::Started(_)) => started = true,
            Ok(Event::DataReceived(_)) => {
                let now = Instant::now();
                match first_data_at {
                    None => first_data_at = Some(now),
                    Some(first) => gap = Some(now.duration_since(first)),
                }
            }
            _ => {}
        }
    }

    server_runtime.request_stop();
    client_runtime.request_stop();
    server_handle.join().expect("server thread panicked").expect("server error");
    client_handle.join().expect("client thread panicked").expect("client error");

    assert!(started, "client never connected");
    let gap = gap.expect("observed two DATA arrivals");
    // Generous tolerance: scheduling jitter under test-harness load, but
    // well clear of the client's original 100ms preference.
    assert!(
        gap >= Duration::from_millis(250),
        "DATA arrived faster than the negotiated interval: {gap:?}"
    );
}
