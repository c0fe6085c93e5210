// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::fragments::FragmentKind;

/// Default time `run` waits for a run to settle
pub const DEFAULT_SETTLE_MS: u64 = 2000;

/// Sandboxed markup/style/script playground
#[derive(Parser, Debug)]
#[command(name = "livepad", version, about = "Sandboxed markup/style/script playground")]
pub struct Cli {
    /// Config file (TOML, or JSON by extension)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the stored fragments
    #[arg(long, global = true, value_name = "PATH")]
    pub state_dir: Option<PathBuf>,

    /// Log engine activity at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the fragments in a fresh sandbox and print its console
    Run(RunArgs),

    /// Print the synthesized sandbox document
    Synth(SourceArgs),

    /// Print one stored fragment
    Show {
        #[arg(value_enum)]
        kind: FragmentKind,
    },

    /// Store one fragment from a file, or stdin with `-`
    Set {
        #[arg(value_enum)]
        kind: FragmentKind,

        #[arg(value_name = "FILE", default_value = "-")]
        file: PathBuf,
    },

    /// Print a share token, or a share link with --base-url
    Share {
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
    },

    /// Import fragments from a share token or link
    Open {
        #[arg(value_name = "LOCATOR")]
        locator: String,
    },

    /// Restore the default fragments
    Reset,

    /// Pack index.html, styles.css and script.js into a ZIP archive
    Export {
        /// Archive path, or a directory to receive code-playground.zip
        #[arg(value_name = "PATH", default_value = ".")]
        target: PathBuf,
    },
}

/// Per-fragment file overrides; unset fragments come from the store
#[derive(Args, Clone, Debug, Default)]
pub struct SourceArgs {
    /// Markup file
    #[arg(long, value_name = "FILE")]
    pub markup: Option<PathBuf>,

    /// Stylesheet file
    #[arg(long, value_name = "FILE")]
    pub style: Option<PathBuf>,

    /// Script file
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,
}

impl SourceArgs {
    pub fn file_for(&self, kind: FragmentKind) -> Option<&PathBuf> {
        match kind {
            FragmentKind::Markup => self.markup.as_ref(),
            FragmentKind::Style => self.style.as_ref(),
            FragmentKind::Script => self.script.as_ref(),
        }
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Console output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// How long to wait for the run to settle, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_SETTLE_MS)]
    pub settle_ms: u64,

    /// Also append every console entry to this JSONL file
    #[arg(long, value_name = "FILE")]
    pub capture: Option<PathBuf>,
}

/// Output format for console entries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Icon-prefixed text lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
