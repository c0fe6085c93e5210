// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! IO helpers for JSON serialization with std::io::Error mapping.

use std::path::Path;

/// Read a JSON document from `path`.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> std::io::Result<T> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(to_io_error)
}

/// Write `value` as JSON, creating parent directories as needed.
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> std::io::Result<()> {
    ensure_parent_exists(path)?;
    let content = serde_json::to_string(value).map_err(to_io_error)?;
    std::fs::write(path, content)
}

/// Remove a file, treating a missing file as already removed.
pub fn remove_if_exists(path: &Path) -> std::io::Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Map an error to std::io::Error with InvalidData kind.
pub fn to_io_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, e)
}

/// Ensure a file's parent directory exists, creating it and ancestors if needed.
pub fn ensure_parent_exists(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
