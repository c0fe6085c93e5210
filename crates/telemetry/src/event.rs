// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Telemetry event types and wire decoding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Diagnostic severity, one per intercepted console method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Log,
    Info,
    Warn,
    Error,
}

impl Severity {
    /// Every severity, in console-method order.
    pub const ALL: [Severity; 4] = [
        Severity::Log,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
    ];

    /// Wire name (`"log"`, `"info"`, `"warn"`, `"error"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Log => "log",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }

    /// Glyph the console shows in front of a message.
    pub fn icon(self) -> &'static str {
        match self {
            Severity::Log => "📝",
            Severity::Info => "ℹ️",
            Severity::Warn => "⚠️",
            Severity::Error => "❌",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|severity| severity.as_str() == s)
            .ok_or_else(|| WireError::UnknownSeverity(s.to_string()))
    }
}

/// Errors produced while decoding a cross-boundary payload.
///
/// The relay never surfaces these to users; they only decide whether a
/// payload is forwarded or dropped.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("payload is not a telemetry event: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown severity '{0}'")]
    UnknownSeverity(String),
}

/// One captured diagnostic emission or failure.
///
/// Fields are private so an event cannot change after construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    #[serde(rename = "type")]
    kind: Severity,
    message: String,
}

impl TelemetryEvent {
    pub fn new(kind: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn log(message: impl Into<String>) -> Self {
        Self::new(Severity::Log, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn kind(&self) -> Severity {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Decode a payload posted across the sandbox boundary.
    ///
    /// The payload must be a JSON object with a known `type` and a string
    /// `message`. Extra fields are ignored.
    pub fn from_wire(payload: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Encode in the shape [`TelemetryEvent::from_wire`] accepts.
    pub fn to_wire(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
