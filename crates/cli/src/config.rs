// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration file types (TOML or JSON).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default per-context QuickJS heap cap (32 MiB)
pub const DEFAULT_MEMORY_LIMIT_BYTES: usize = 32 * 1024 * 1024;
/// Default per-context stack cap (1 MiB)
pub const DEFAULT_MAX_STACK_BYTES: usize = 1024 * 1024;
/// Default number of timer callbacks one context may run
pub const DEFAULT_TIMER_BUDGET: u32 = 10_000;
/// Default wall-clock lifetime of one context's timer loop
pub const DEFAULT_MAX_LIFETIME_MS: u64 = 30_000;

/// File name looked up inside the state directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LivepadConfig {
    #[serde(default)]
    pub sandbox: SandboxConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

/// Resource limits applied to every execution context
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct SandboxConfig {
    /// QuickJS heap cap in bytes
    pub memory_limit_bytes: usize,

    /// QuickJS stack cap in bytes
    pub max_stack_bytes: usize,

    /// Maximum timer callbacks run per context
    pub timer_budget: u32,

    /// Context stops scheduling timers after this many milliseconds
    pub max_lifetime_ms: u64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            memory_limit_bytes: DEFAULT_MEMORY_LIMIT_BYTES,
            max_stack_bytes: DEFAULT_MAX_STACK_BYTES,
            timer_budget: DEFAULT_TIMER_BUDGET,
            max_lifetime_ms: DEFAULT_MAX_LIFETIME_MS,
        }
    }
}

impl SandboxConfig {
    pub fn max_lifetime(&self) -> Duration {
        Duration::from_millis(self.max_lifetime_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.memory_limit_bytes == 0 {
            return Err(ConfigError::Invalid(
                "sandbox.memory_limit_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_stack_bytes == 0 {
            return Err(ConfigError::Invalid(
                "sandbox.max_stack_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fragment store settings
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// State directory override (`LIVEPAD_STATE_DIR` and `--state-dir` win)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl LivepadConfig {
    /// Load a config from a TOML or JSON file (chosen by extension)
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content, path.extension().is_some_and(|e| e == "json"))?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`LivepadConfig::load`], but a missing file yields the defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    fn parse(content: &str, json: bool) -> Result<Self, ConfigError> {
        if json {
            Ok(serde_json::from_str(content)?)
        } else {
            Ok(toml::from_str(content)?)
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sandbox.validate()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
