// SPDX-License-Identifier: MIT OR Apache-2.0

//! Demo binary: loads an [`AdapterConfig`] from YAML and drives the
//! adapter protocol as either peer, with a trivial heartbeat `Context`
//! that writes/reads a single wall-clock millisecond counter as its DATA
//! payload.

use std::{path::PathBuf, sync::Arc};

use clap::{Parser, ValueEnum};
use simlink_rs::{
    AdapterConfig, Context, RuntimeState,
    cfg::{cli::resolve_config_path, logger},
    codec::flags::{CapabilityFlags, RejectReason},
    databuf::DataBuf,
    run_client, run_server,
};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Mode {
    Server,
    Client,
}

#[derive(Parser, Debug)]
#[command(name = "simlinkd", about = "Demo driver for the simlink-rs adapter protocol")]
struct Args {
    #[arg(long, value_enum)]
    mode: Mode,

    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    log_dir: Option<PathBuf>,
}

/// Heartbeat payload: a single i64 wall-clock millisecond counter.
struct HeartbeatContext;

impl Context for HeartbeatContext {
    fn write_request(&self, _buf: &mut DataBuf, pos: usize) -> usize {
        pos
    }

    fn check_request(
        &self,
        peer_host: &str,
        _peer_service: &str,
        _flags: CapabilityFlags,
        schema: &str,
        _sim_ms: &mut i64,
        _interval_ms: &mut i32,
    ) -> RejectReason {
        tracing::info!(peer = peer_host, schema, "accepting connection");
        RejectReason::empty()
    }

    fn write_data(&self, buf: &mut DataBuf, pos: usize) -> Option<usize> {
        Some(buf.write_i64(pos, simlink_rs::clock::epoch_ms()))
    }

    fn read_data(&self, buf: &DataBuf, pos: usize) -> usize {
        if let Some(ts) = buf.peek_i64(pos) {
            tracing::info!(peer_epoch_ms = ts, "heartbeat received");
        }
        pos
    }

    fn connection_started(&self, remote_id: i32) {
        tracing::info!(remote_id, "connection started");
    }

    fn connection_terminated(&self) {
        tracing::info!("connection terminated");
    }

    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warning(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _guard = logger::init_logging(args.log_dir.as_deref());

    let config_path = resolve_config_path(args.config.as_deref());
    let cfg = AdapterConfig::load(&config_path)?;

    let context: Arc<dyn Context> = Arc::new(HeartbeatContext);
    let runtime = Arc::new(RuntimeState::new());

    let stop_handle = Arc::clone(&runtime);
    ctrlc_handler(move || stop_handle.request_stop());

    let clean = match args.mode {
        Mode::Server => run_server(&cfg, context, runtime)?,
        Mode::Client => run_client(&cfg, context, runtime)?,
    };

    if !clean {
        anyhow::bail!("driver exited uncleanly");
    }
    Ok(())
}

/// Installs a Ctrl-C handler that flips `RuntimeState::request_stop` so a
/// session winds down cleanly (final DATA + STOP) instead of the process
/// being killed mid-session.
fn ctrlc_handler(on_stop: impl Fn() + Send + 'static) {
    let _ = ctrlc::set_handler(on_stop);
}
