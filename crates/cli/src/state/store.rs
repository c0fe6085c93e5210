// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fragment persistence.
//!
//! Each fragment lives in its own entry, `<root>/<storage key>.json`, holding
//! the text as a JSON string. A missing entry means "use the default", and
//! so does an entry that cannot be read back.

use super::directory::{StateDirectory, StateError};
use super::io::{read_json, remove_if_exists, write_json};
use crate::fragments::{FragmentKind, Fragments};

#[derive(Clone, Debug)]
pub struct FragmentStore {
    dir: StateDirectory,
}

impl FragmentStore {
    pub fn new(dir: StateDirectory) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &StateDirectory {
        &self.dir
    }

    /// The stored text for `kind`, `None` when there is no entry.
    pub fn read(&self, kind: FragmentKind) -> Result<Option<String>, StateError> {
        let path = self.dir.fragment_path(kind);
        match read_json::<String>(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                Err(StateError::Corrupt { path, source: e })
            }
            Err(e) => Err(StateError::Io(e)),
        }
    }

    /// The stored text for `kind`, or its default.
    pub fn load(&self, kind: FragmentKind) -> String {
        match self.read(kind) {
            Ok(Some(text)) => text,
            Ok(None) => kind.default_text().to_string(),
            Err(err) => {
                tracing::warn!(key = kind.storage_key(), error = %err, "falling back to default fragment");
                kind.default_text().to_string()
            }
        }
    }

    pub fn load_all(&self) -> Fragments {
        let mut fragments = Fragments::default();
        for kind in FragmentKind::ALL {
            fragments.set(kind, self.load(kind));
        }
        fragments
    }

    pub fn save(&self, kind: FragmentKind, text: &str) -> Result<(), StateError> {
        self.dir.initialize()?;
        write_json(&self.dir.fragment_path(kind), &text)?;
        tracing::debug!(key = kind.storage_key(), bytes = text.len(), "fragment saved");
        Ok(())
    }

    pub fn save_all(&self, fragments: &Fragments) -> Result<(), StateError> {
        for fragment in fragments.iter() {
            self.save(fragment.kind, fragment.text)?;
        }
        Ok(())
    }

    /// Remove every entry so the defaults apply again.
    pub fn reset(&self) -> Result<(), StateError> {
        for kind in FragmentKind::ALL {
            remove_if_exists(&self.dir.fragment_path(kind))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
