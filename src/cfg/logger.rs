// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured logging setup: stdout plus an optional rolling file
//! appender, both through `tracing-subscriber`.

use std::path::Path;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes the global `tracing` subscriber. If `log_dir` is `Some`,
/// a daily-rolling JSON file appender is layered on top of the default
/// human-readable stdout layer; the returned guard must be kept alive for
/// the appender to flush on drop.
pub fn init_logging(log_dir: Option<&Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = fmt::layer().with_target(false).compact();

    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "simlink.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = fmt::layer().json().with_writer(non_blocking);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(stdout_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(env_filter).with(stdout_layer).init();
            None
        }
    }
}
