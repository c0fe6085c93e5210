// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Telemetry events relayed out of livepad sandboxes.
//!
//! This crate holds the pieces shared by the sandbox host and whatever
//! presents its output: the [`TelemetryEvent`] wire type, the
//! [`TelemetrySink`] callback contract, and [`ConsoleLog`], an in-memory
//! (optionally JSONL-backed) console that records every delivered event.

mod event;
mod log;
mod millis;
mod sink;

pub use event::{Severity, TelemetryEvent, WireError};
pub use log::{ConsoleEntry, ConsoleLog};
pub use sink::TelemetrySink;
