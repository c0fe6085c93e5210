// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Console log: the record of every event a sink received.

use crate::event::{Severity, TelemetryEvent};
use crate::millis;
use crate::sink::TelemetrySink;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

/// One recorded console line.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsoleEntry {
    /// Sequence number since the log was created or last cleared
    pub seq: u64,

    /// Wall-clock timestamp
    pub timestamp: SystemTime,

    /// Time since the log was created
    #[serde(rename = "elapsed_ms", with = "millis")]
    pub elapsed: Duration,

    #[serde(flatten)]
    pub event: TelemetryEvent,
}

/// Console log shared between a relay (writer) and a presenter (reader).
///
/// Clones share the same entries, so one clone can be handed to each run's
/// relay while the presenter keeps another.
pub struct ConsoleLog {
    start: Instant,
    entries: Arc<Mutex<Vec<ConsoleEntry>>>,
    file_writer: Option<Arc<Mutex<BufWriter<File>>>>,
}

impl ConsoleLog {
    /// Create a new in-memory console log
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            entries: Arc::new(Mutex::new(Vec::new())),
            file_writer: None,
        }
    }

    /// Create a console log that also appends JSONL to a file
    pub fn with_file(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            start: Instant::now(),
            entries: Arc::new(Mutex::new(Vec::new())),
            file_writer: Some(Arc::new(Mutex::new(BufWriter::new(file)))),
        })
    }

    /// Record a delivered event
    pub fn record(&self, event: TelemetryEvent) {
        let mut entries = self.entries.lock();
        let entry = ConsoleEntry {
            seq: entries.len() as u64,
            timestamp: SystemTime::now(),
            elapsed: self.start.elapsed(),
            event,
        };

        if let Some(ref writer) = self.file_writer {
            use std::io::Write;
            let mut w = writer.lock();
            if let Ok(json) = serde_json::to_string(&entry) {
                let _ = writeln!(w, "{}", json);
                let _ = w.flush();
            }
        }

        entries.push(entry);
    }

    /// All recorded entries, oldest first
    pub fn entries(&self) -> Vec<ConsoleEntry> {
        self.entries.lock().clone()
    }

    /// All recorded events, oldest first
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.entries.lock().iter().map(|e| e.event.clone()).collect()
    }

    /// Messages only, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|e| e.event.message().to_string())
            .collect()
    }

    /// Get the last N entries
    pub fn last(&self, n: usize) -> Vec<ConsoleEntry> {
        let all = self.entries.lock();
        all.iter().rev().take(n).rev().cloned().collect()
    }

    /// Count entries matching a predicate
    pub fn count<F: Fn(&ConsoleEntry) -> bool>(&self, pred: F) -> usize {
        self.entries.lock().iter().filter(|e| pred(e)).count()
    }

    /// Entries of one severity
    pub fn by_severity(&self, kind: Severity) -> Vec<ConsoleEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.event.kind() == kind)
            .cloned()
            .collect()
    }

    /// Entries with `error` severity
    pub fn errors(&self) -> Vec<ConsoleEntry> {
        self.by_severity(Severity::Error)
    }

    /// Whether any error was recorded; the presenter reveals itself on errors
    pub fn has_errors(&self) -> bool {
        self.entries
            .lock()
            .iter()
            .any(|e| e.event.kind() == Severity::Error)
    }

    /// Find entries whose message contains `pattern`
    pub fn find(&self, pattern: &str) -> Vec<ConsoleEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.event.message().contains(pattern))
            .cloned()
            .collect()
    }

    /// Get the total number of entries
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Clear all entries; the next entry starts again at sequence 0
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ConsoleLog {
    fn clone(&self) -> Self {
        Self {
            start: self.start,
            entries: Arc::clone(&self.entries),
            file_writer: self.file_writer.as_ref().map(Arc::clone),
        }
    }
}

impl TelemetrySink for ConsoleLog {
    fn on_event(&mut self, event: TelemetryEvent) {
        self.record(event);
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
