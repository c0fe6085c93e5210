// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by livepad are defined here.
//! Use these accessors instead of calling `std::env::var()` directly.

/// Generated env var name constants.
mod names {
    include!(concat!(env!("OUT_DIR"), "/env_names.rs"));
}

// Re-export name constants for callers that need the raw name string.
pub use names::*;

use std::path::PathBuf;

/// `LIVEPAD_CONFIG` — Config file override.
pub fn config_path() -> Option<PathBuf> {
    var_path(names::LIVEPAD_CONFIG)
}

/// `LIVEPAD_STATE_DIR` — State directory override.
pub fn state_dir() -> Option<PathBuf> {
    var_path(names::LIVEPAD_STATE_DIR)
}

/// `LIVEPAD_LOG` — `tracing` filter directives (e.g. `livepad=debug`).
pub fn log_filter() -> Option<String> {
    std::env::var(names::LIVEPAD_LOG)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// `HOME` — User's home directory.
pub fn home() -> Option<PathBuf> {
    var_path(names::HOME)
}

fn var_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
