// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loading, CLI path resolution, and logging setup.

pub mod cli;
pub mod config;
pub mod logger;

pub use config::AdapterConfig;
