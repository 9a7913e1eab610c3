// SPDX-License-Identifier: MIT OR Apache-2.0

//! `simlink-rs`: a bidirectional UDP adapter protocol for exchanging
//! periodic simulation/track data with a remote peer, plus the session
//! state machine, framing codec, and concurrency model it runs on.

pub mod cfg;
pub mod clock;
pub mod codec;
pub mod context;
pub mod databuf;
pub mod driver;
pub mod error;
pub mod net;
pub mod session;

pub use cfg::AdapterConfig;
pub use context::{Context, RuntimeState};
pub use driver::{run_client, run_server};
