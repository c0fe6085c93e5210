// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command execution.
//!
//! [`App`] holds the resolved configuration and fragment store; each command
//! writes its user-facing output to the writer it is handed.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use livepad_telemetry::ConsoleLog;
use thiserror::Error;

use crate::cli::{Cli, Command, RunArgs, SourceArgs};
use crate::config::{ConfigError, LivepadConfig};
use crate::controller::{RunController, RunError};
use crate::env;
use crate::export::{export_bundle, ExportError};
use crate::fragments::{FragmentKind, Fragments};
use crate::output::{print_warning, ConsoleWriter};
use crate::sandbox::ExecutionContextHost;
use crate::share::{self, ShareError};
use crate::state::{FragmentStore, StateDirectory, StateError};
use crate::synth::synthesize_fragments;

/// How often `run` flushes new console entries while waiting
const STREAM_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("Invalid share token: {0}")]
    Share(#[from] ShareError),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Resolved configuration plus the fragment store.
#[derive(Debug)]
pub struct App {
    config: LivepadConfig,
    store: FragmentStore,
}

impl App {
    pub fn new(config: LivepadConfig, store: FragmentStore) -> Self {
        Self { config, store }
    }

    /// Resolve the config file and state directory for `cli`.
    ///
    /// The config file is `--config`, else `LIVEPAD_CONFIG`, else
    /// `config.toml` inside the state directory named by `--state-dir`,
    /// `LIVEPAD_STATE_DIR` or `$HOME/.livepad`. An explicitly named config
    /// file must exist. `[store].dir` from that file then takes its place
    /// in the state directory precedence.
    pub fn from_cli(cli: &Cli) -> Result<Self, CommandError> {
        let explicit_dir = cli.state_dir.as_deref();
        let explicit_config = cli.config.clone().or_else(env::config_path);

        let config = match explicit_config {
            Some(path) => LivepadConfig::load(&path)?,
            None => match StateDirectory::resolve(explicit_dir, None) {
                Ok(dir) => LivepadConfig::load_or_default(&dir.config_path())?,
                Err(_) => LivepadConfig::default(),
            },
        };

        let dir = StateDirectory::resolve(explicit_dir, config.store.dir.as_deref())?;
        tracing::debug!(state_dir = %dir.root().display(), "state directory resolved");
        Ok(Self::new(config, FragmentStore::new(dir)))
    }

    pub fn config(&self) -> &LivepadConfig {
        &self.config
    }

    pub fn store(&self) -> &FragmentStore {
        &self.store
    }

    /// Execute one parsed command. `stdin` feeds `set <kind> -`.
    pub async fn execute<W: Write, R: Read>(
        &self,
        command: &Command,
        out: &mut W,
        stdin: R,
    ) -> Result<(), CommandError> {
        match command {
            Command::Run(args) => self.run(args, out).await,
            Command::Synth(sources) => self.synth(sources, out),
            Command::Show { kind } => self.show(*kind, out),
            Command::Set { kind, file } => self.set(*kind, file, stdin, out),
            Command::Share { base_url } => self.share(base_url.as_deref(), out),
            Command::Open { locator } => self.open(locator, out),
            Command::Reset => self.reset(out),
            Command::Export { target } => self.export(target, out),
        }
    }

    /// Stored fragments with any file overrides applied.
    pub fn sources(&self, overrides: &SourceArgs) -> Result<Fragments, CommandError> {
        let mut fragments = self.store.load_all();
        for kind in FragmentKind::ALL {
            if let Some(path) = overrides.file_for(kind) {
                fragments.set(kind, read_file(path)?);
            }
        }
        Ok(fragments)
    }

    /// Run the fragments and stream the console until the run settles or
    /// the settle window ends.
    pub async fn run<W: Write>(&self, args: &RunArgs, out: &mut W) -> Result<(), CommandError> {
        let fragments = self.sources(&args.sources)?;
        let log = match &args.capture {
            Some(path) => ConsoleLog::with_file(path)?,
            None => ConsoleLog::new(),
        };

        let host = ExecutionContextHost::new(self.config.sandbox.clone());
        let mut controller = RunController::new(host, log.clone());
        controller.run(&fragments)?;

        let mut writer = ConsoleWriter::new(out, args.format);
        let mut printed = 0;
        let settled = {
            let settle = controller.settle(Duration::from_millis(args.settle_ms));
            tokio::pin!(settle);
            let mut ticker = tokio::time::interval(STREAM_INTERVAL);
            loop {
                tokio::select! {
                    settled = &mut settle => break settled,
                    _ = ticker.tick() => printed = writer.write_since(&log, printed)?,
                }
            }
        };
        if !settled {
            print_warning(format_args!(
                "run still active after {} ms; stopped it (raise --settle-ms to wait longer)",
                args.settle_ms
            ));
        }

        controller.dispose();
        printed = writer.write_since(&log, printed)?;
        if printed == 0 {
            writer.write_empty()?;
        }
        Ok(())
    }

    pub fn synth<W: Write>(&self, sources: &SourceArgs, out: &mut W) -> Result<(), CommandError> {
        let doc = synthesize_fragments(&self.sources(sources)?);
        out.write_all(doc.as_str().as_bytes())?;
        Ok(())
    }

    pub fn show<W: Write>(&self, kind: FragmentKind, out: &mut W) -> Result<(), CommandError> {
        let text = self.store.load(kind);
        out.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn set<W: Write, R: Read>(
        &self,
        kind: FragmentKind,
        file: &Path,
        mut stdin: R,
        out: &mut W,
    ) -> Result<(), CommandError> {
        let text = if file == Path::new("-") {
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .map_err(|source| CommandError::Read {
                    path: file.to_path_buf(),
                    source,
                })?;
            text
        } else {
            read_file(file)?
        };
        self.store.save(kind, &text)?;
        writeln!(out, "Saved {kind} ({} bytes)", text.len())?;
        Ok(())
    }

    pub fn share<W: Write>(&self, base_url: Option<&str>, out: &mut W) -> Result<(), CommandError> {
        let fragments = self.store.load_all();
        match base_url {
            Some(base) => writeln!(out, "{}", share::share_url(base, &fragments))?,
            None => writeln!(out, "{}", share::encode(&fragments))?,
        }
        Ok(())
    }

    /// Import a shared triple into the store. Fields the token lacks stay.
    pub fn open<W: Write>(&self, locator: &str, out: &mut W) -> Result<(), CommandError> {
        let shared = share::decode_locator(locator)?;
        let mut fragments = self.store.load_all();
        let imported = shared.apply_to(&mut fragments);
        for kind in &imported {
            self.store.save(*kind, fragments.get(*kind))?;
        }

        if imported.is_empty() {
            writeln!(out, "Nothing to import")?;
        } else {
            let labels: Vec<_> = imported.iter().map(|kind| kind.label()).collect();
            writeln!(out, "Imported {}", labels.join(", "))?;
        }
        Ok(())
    }

    pub fn reset<W: Write>(&self, out: &mut W) -> Result<(), CommandError> {
        self.store.reset()?;
        writeln!(out, "Restored default fragments")?;
        Ok(())
    }

    pub fn export<W: Write>(&self, target: &Path, out: &mut W) -> Result<(), CommandError> {
        let path = export_bundle(target, &self.store.load_all())?;
        writeln!(out, "{}", path.display())?;
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<String, CommandError> {
    std::fs::read_to_string(path).map_err(|source| CommandError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
