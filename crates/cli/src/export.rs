// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Export bundle: the three raw fragments packed into one ZIP archive.

use crate::fragments::Fragments;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Archive name used when the target is a directory.
pub const BUNDLE_FILE_NAME: &str = "code-playground.zip";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write bundle {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to build bundle {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Where the archive for `target` goes.
///
/// An existing directory receives [`BUNDLE_FILE_NAME`]; anything else is
/// taken as the archive path itself.
pub fn bundle_path(target: &Path) -> PathBuf {
    if target.is_dir() {
        target.join(BUNDLE_FILE_NAME)
    } else {
        target.to_path_buf()
    }
}

/// Write `index.html`, `styles.css` and `script.js` into one archive.
///
/// Overwrites an existing archive and creates missing parent directories.
/// Returns the archive path.
pub fn export_bundle(target: &Path, fragments: &Fragments) -> Result<PathBuf, ExportError> {
    let path = bundle_path(target);
    let io_err = |source| ExportError::Io {
        path: path.clone(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = File::create(&path).map_err(io_err)?;

    let zip_err = |source| ExportError::Zip {
        path: path.clone(),
        source,
    };
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut archive = ZipWriter::new(file);
    for fragment in fragments.iter() {
        archive
            .start_file(fragment.kind.file_name(), options)
            .map_err(zip_err)?;
        archive.write_all(fragment.text.as_bytes()).map_err(io_err)?;
    }
    archive.finish().map_err(zip_err)?;

    tracing::debug!(path = %path.display(), "bundle exported");
    Ok(path)
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
