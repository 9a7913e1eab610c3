// SPDX-License-Identifier: MIT OR Apache-2.0

//! The server rejects an unrecognized schema and the client surfaces a
//! `HandshakeError`, while the server loops back to
//! `WaitRequest` for the next peer.

use std::{
    sync::{Arc, mpsc},
    thread,
    time::Duration,
};

use serial_test::serial;
use simlink_rs::{
    RuntimeState,
    codec::flags::RejectReason,
    error::{DriverFatal, HandshakeError},
    run_client, run_server,
};

use super::common::{RecordingContext, base_config, free_port};

#[test]
#[serial]
fn unknown_schema_is_rejected_and_server_keeps_listening() {
    let server_port = free_port();
    let client_bind_port = free_port();

    let server_cfg = base_config(server_port, 0);
    let mut client_cfg = base_config(server_port, client_bind_port);
    client_cfg.schema = "foo".to_string();

    let (server_tx, _server_rx) = mpsc::channel();
    let (client_tx, _client_rx) = mpsc::channel();

    let server_runtime = Arc::new(RuntimeState::new());
    let client_runtime = Arc::new(RuntimeState::new());

    let server_ctx = Arc::new(RecordingContext::rejecting(
        server_tx,
        RejectReason::UNKNOWN_DATA_SCHEMA,
    ));
    let client_ctx = Arc::new(RecordingContext::new(client_tx));

    let server_runtime_for_thread = server_runtime.clone();
    let server_handle =
        thread::spawn(move || run_server(&server_cfg, server_ctx, server_runtime_for_thread));

    thread::sleep(Duration::from_millis(50));

    let client_result = run_client(&client_cfg, client_ctx, client_runtime);

    match client_result {
        Err(DriverFatal::Handshake(HandshakeError::Rejected(reason))) => {
            assert_eq!(reason, RejectReason::UNKNOWN_DATA_SCHEMA.bits() as u32);
        }
        other => panic!("expected a rejected handshake error, got {other:?}"),
    }

    // the server must still be alive, waiting for the next REQUEST
    server_runtime.request_stop();
    let server_ok = server_handle.join().expect("server thread panicked").expect("server error");
    assert!(server_ok);
}
