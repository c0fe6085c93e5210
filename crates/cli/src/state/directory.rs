// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The `~/.livepad` state directory.
//!
//! This module provides the `StateDirectory` type, which resolves where state
//! lives and manages the directory itself. For pure path computation without
//! I/O, see the [`paths`](super::paths) module.

use super::paths::{default_root, StatePaths};
use crate::env;
use crate::fragments::FragmentKind;
use std::fs::{self, Permissions};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot locate a state directory: pass --state-dir or set LIVEPAD_STATE_DIR or HOME")]
    NoHome,

    #[error("Corrupt fragment entry {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where fragments and the default config file live.
#[derive(Clone, Debug)]
pub struct StateDirectory {
    paths: StatePaths,
}

impl StateDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            paths: StatePaths::new(root),
        }
    }

    /// Resolve the state directory from the command line, environment and config.
    ///
    /// # Priority
    ///
    /// 1. `--state-dir` (`explicit`)
    /// 2. `LIVEPAD_STATE_DIR`
    /// 3. `[store].dir` from the config file (`configured`)
    /// 4. `$HOME/.livepad`
    pub fn resolve(explicit: Option<&Path>, configured: Option<&Path>) -> Result<Self, StateError> {
        Self::resolve_from(
            explicit.map(Path::to_path_buf),
            env::state_dir(),
            configured.map(Path::to_path_buf),
            env::home(),
        )
    }

    /// Precedence logic of [`StateDirectory::resolve`] over explicit inputs.
    pub fn resolve_from(
        explicit: Option<PathBuf>,
        from_env: Option<PathBuf>,
        configured: Option<PathBuf>,
        home: Option<PathBuf>,
    ) -> Result<Self, StateError> {
        explicit
            .or(from_env)
            .or(configured)
            .or_else(|| home.map(|home| default_root(&home)))
            .map(Self::new)
            .ok_or(StateError::NoHome)
    }

    /// Create the directory (user-only permissions) if it does not exist.
    pub fn initialize(&self) -> Result<(), StateError> {
        if !self.root().exists() {
            fs::create_dir_all(self.root())?;
            self.set_permissions(self.root(), 0o700)?;
        }
        Ok(())
    }

    /// Get the underlying path computation helper.
    pub fn paths(&self) -> &StatePaths {
        &self.paths
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        self.paths.root()
    }

    pub fn fragment_path(&self, kind: FragmentKind) -> PathBuf {
        self.paths.fragment_path(kind)
    }

    /// Default config file location.
    pub fn config_path(&self) -> PathBuf {
        self.paths.config_path()
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> Result<(), StateError> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = Permissions::from_mode(mode);
            fs::set_permissions(path, perms)?;
        }
        #[cfg(not(unix))]
        {
            let _ = (path, mode);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "directory_tests.rs"]
mod tests;
