// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Console presentation and diagnostic output.
//!
//! Console entries render either as icon-prefixed text or as JSON lines.
//! Diagnostics go to stderr, in color when stderr is a terminal.

use crate::cli::OutputFormat;
use livepad_telemetry::{ConsoleEntry, ConsoleLog};
use std::io::{self, IsTerminal, Write};

/// Shown when a run produced no console output.
pub const EMPTY_CONSOLE: &str = "Console is empty. Run your code to see output here.";

/// Writes console entries in the configured format
pub struct ConsoleWriter<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> ConsoleWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    pub fn write_entry(&mut self, entry: &ConsoleEntry) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                let kind = entry.event.kind();
                writeln!(self.writer, "{} {}", kind.icon(), entry.event.message())
            }
            OutputFormat::Json => {
                let line = serde_json::to_string(entry).map_err(io::Error::other)?;
                writeln!(self.writer, "{line}")
            }
        }
    }

    /// Write the entries of `log` from index `from` on; returns the new count.
    pub fn write_since(&mut self, log: &ConsoleLog, from: usize) -> io::Result<usize> {
        let entries = log.entries();
        for entry in entries.iter().skip(from) {
            self.write_entry(entry)?;
        }
        self.writer.flush()?;
        Ok(entries.len().max(from))
    }

    /// The empty-console notice. JSON output stays silent.
    pub fn write_empty(&mut self) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.writer, "{EMPTY_CONSOLE}"),
            OutputFormat::Json => Ok(()),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Print an error message to stderr.
///
/// Displays in red when stderr is a terminal, plain text otherwise.
pub fn print_error(msg: impl std::fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_diagnostic(&mut io::stderr(), Diagnostic::Error, msg, is_tty);
}

/// Print a warning message to stderr.
///
/// Displays in yellow when stderr is a terminal, plain text otherwise.
pub fn print_warning(msg: impl std::fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_diagnostic(&mut io::stderr(), Diagnostic::Warning, msg, is_tty);
}

#[derive(Clone, Copy, Debug)]
enum Diagnostic {
    Error,
    Warning,
}

impl Diagnostic {
    fn label(self) -> &'static str {
        match self {
            Diagnostic::Error => "Error",
            Diagnostic::Warning => "Warning",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Diagnostic::Error => "\x1b[31m",
            Diagnostic::Warning => "\x1b[33m",
        }
    }
}

fn write_diagnostic<W: Write>(
    writer: &mut W,
    kind: Diagnostic,
    msg: impl std::fmt::Display,
    is_terminal: bool,
) {
    if is_terminal {
        let _ = writeln!(writer, "{}{}: {}\x1b[0m", kind.color(), kind.label(), msg);
    } else {
        let _ = writeln!(writer, "{}: {}", kind.label(), msg);
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
