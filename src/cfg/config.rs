// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML-backed adapter configuration: a plain serde struct plus a
//! `validate_and_normalize` pass that rejects bad values before the driver
//! ever sees them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::flags::CapabilityFlags;

/// Default server listen port.
pub const DEFAULT_SERVER_PORT: u16 = 50036;
/// Default client bind port.
pub const DEFAULT_CLIENT_PORT: u16 = 50037;
/// Maximum datagram size, chosen to stay clear of IP fragmentation.
pub const DEFAULT_MAX_MSG_LEN: usize = 2048;
/// `recvfrom` timeout while awaiting ACCEPT in client mode.
pub const RECV_TIMEOUT_MS: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Remote host; ignored in server mode.
    #[serde(default)]
    pub host: String,
    /// Server mode: the port to listen on. Client mode: the server's port
    /// to connect to.
    pub port: u16,
    /// Client mode only: the local port to bind before sending REQUEST.
    /// Ignored in server mode.
    #[serde(default = "default_client_bind_port")]
    pub bind_port: u16,
    #[serde(default)]
    pub schema: String,
    #[serde(default)]
    pub flags: i32,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: i32,
    /// Client-only: reconnect backoff. `0` disables retry.
    #[serde(default)]
    pub connect_interval_ms: i32,
    #[serde(default = "default_max_msg_len")]
    pub max_msg_len: usize,
}

fn default_interval_ms() -> i32 {
    1000
}

fn default_client_bind_port() -> u16 {
    DEFAULT_CLIENT_PORT
}

fn default_max_msg_len() -> usize {
    DEFAULT_MAX_MSG_LEN
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_SERVER_PORT,
            bind_port: DEFAULT_CLIENT_PORT,
            schema: String::new(),
            flags: 0,
            interval_ms: default_interval_ms(),
            connect_interval_ms: 0,
            max_msg_len: default_max_msg_len(),
        }
    }
}

impl AdapterConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {e}", path.display()))?;
        let cfg: Self = serde_yaml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("parsing config {}: {e}", path.display()))?;
        cfg.validate_and_normalize()
    }

    /// Rejects configurations that would violate a wire invariant and
    /// clamps the schema/host length expectations the codec assumes.
    fn validate_and_normalize(mut self) -> anyhow::Result<Self> {
        if self.max_msg_len == 0 || self.max_msg_len > DEFAULT_MAX_MSG_LEN {
            anyhow::bail!(
                "max_msg_len must be in 1..={DEFAULT_MAX_MSG_LEN}, got {}",
                self.max_msg_len
            );
        }
        if self.interval_ms < 0 {
            anyhow::bail!("interval_ms must be >= 0, got {}", self.interval_ms);
        }
        if self.connect_interval_ms < 0 {
            anyhow::bail!("connect_interval_ms must be >= 0, got {}", self.connect_interval_ms);
        }
        if self.schema.len() > u16::MAX as usize {
            anyhow::bail!("schema string too long for the wire length prefix");
        }
        self.schema = self.schema.trim().to_string();
        Ok(self)
    }

    pub fn capability_flags(&self) -> CapabilityFlags {
        CapabilityFlags::from_bits_truncate(self.flags)
    }
}
