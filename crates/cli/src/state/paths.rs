// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Path computation for the state directory.

use crate::config::CONFIG_FILE_NAME;
use crate::fragments::FragmentKind;
use std::path::{Path, PathBuf};

/// Directory name used under `$HOME` when nothing else is configured.
pub const DEFAULT_DIR_NAME: &str = ".livepad";

/// Pure path computation rooted at a state directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatePaths {
    root: PathBuf,
}

impl StatePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fragment_path(&self, kind: FragmentKind) -> PathBuf {
        fragment_path(&self.root, kind)
    }

    pub fn config_path(&self) -> PathBuf {
        config_path(&self.root)
    }
}

// Free functions for path computation

/// `<root>/<storage key>.json`
pub fn fragment_path(root: &Path, kind: FragmentKind) -> PathBuf {
    root.join(format!("{}.json", kind.storage_key()))
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

pub fn default_root(home: &Path) -> PathBuf {
    home.join(DEFAULT_DIR_NAME)
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
