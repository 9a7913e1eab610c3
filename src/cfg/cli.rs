// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config path resolution: an explicit `--config` flag wins, otherwise
//! fall back to an environment variable, otherwise a conventional default
//! in the current directory.

use std::path::{Path, PathBuf};

const CONFIG_ENV_VAR: &str = "SIMLINK_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "simlink.yaml";

pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(from_env) = std::env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(from_env);
    }
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
