// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Execution context host.
//!
//! Owns at most one isolated context at a time and is the only holder of a
//! live reference to it. Loading replaces the context atomically from the
//! caller's point of view: the previous one is abandoned before the next is
//! spawned, so two generations of instrumentation never share a channel.

mod context;
mod surface;

pub use surface::{ScriptBlock, Surface};

use crate::config::SandboxConfig;
use crate::relay::{self, Inbox, RelayError, RelaySession, SessionShared};
use crate::synth::SynthesizedDocument;
use context::ContextHandle;
use livepad_telemetry::TelemetrySink;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Static document shown before the first run.
pub const PLACEHOLDER_DOCUMENT: &str = "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\" />\n<style>body { font-family: system-ui, sans-serif; color: #6b7280; display: flex; align-items: center; justify-content: center; height: 100vh; margin: 0; }</style>\n</head>\n<body>\n<p>Press Run (Ctrl+Enter) to execute your code.</p>\n</body>\n</html>\n";

/// Identifier of one loaded context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContextId(u64);

impl ContextId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors from loading a document.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("relay for context {0} is still armed; dispose it before loading")]
    RelayStillArmed(ContextId),

    #[error("failed to spawn execution context: {0}")]
    Spawn(#[source] std::io::Error),
}

/// The currently loaded context.
struct Loaded {
    handle: ContextHandle,
    /// Held until a relay is armed on it.
    inbox: Option<Inbox>,
}

pub struct ExecutionContextHost {
    config: SandboxConfig,
    last_id: u64,
    current: Option<Loaded>,
    surface: Surface,
    relay: Option<Arc<SessionShared>>,
}

impl ExecutionContextHost {
    /// A host presenting the placeholder document.
    pub fn new(config: SandboxConfig) -> Self {
        Self {
            config,
            last_id: 0,
            current: None,
            surface: Surface::parse(PLACEHOLDER_DOCUMENT),
            relay: None,
        }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Replace the current context with a fresh one running `doc`.
    pub fn load(&mut self, doc: &SynthesizedDocument) -> Result<ContextId, HostError> {
        if let Some(armed) = self.armed_relay() {
            return Err(HostError::RelayStillArmed(armed));
        }
        self.discard_context();

        self.last_id += 1;
        let id = ContextId(self.last_id);
        let surface = Surface::parse(doc.as_str());
        let (port, inbox) = relay::channel(id);
        let handle = ContextHandle::spawn(id, &surface, &self.config, port)?;

        tracing::debug!(
            context = %id,
            scripts = surface.scripts.len(),
            bytes = doc.len(),
            "context.loaded"
        );
        self.surface = surface;
        self.current = Some(Loaded {
            handle,
            inbox: Some(inbox),
        });
        Ok(id)
    }

    /// Arm the one relay for the current context.
    pub fn arm<S: TelemetrySink>(&mut self, sink: S) -> Result<RelaySession, RelayError> {
        if let Some(armed) = self.armed_relay() {
            return Err(RelayError::AlreadyArmed(armed));
        }
        let loaded = self.current.as_mut().ok_or(RelayError::NotLoaded)?;
        let id = loaded.handle.id();
        let inbox = loaded.inbox.take().ok_or(RelayError::Retired(id))?;
        match RelaySession::arm(inbox, sink) {
            Ok(session) => {
                self.relay = Some(session.shared());
                Ok(session)
            }
            Err(err) => {
                // The inbox is consumed; the context can never be relayed.
                loaded.handle.abandon();
                Err(err)
            }
        }
    }

    /// Abandon the current context and go back to the placeholder.
    pub fn discard(&mut self) {
        self.discard_context();
        self.surface = Surface::parse(PLACEHOLDER_DOCUMENT);
    }

    /// What the host currently presents.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn current_context(&self) -> Option<ContextId> {
        self.current.as_ref().map(|loaded| loaded.handle.id())
    }

    pub fn is_armed(&self) -> bool {
        self.armed_relay().is_some()
    }

    fn armed_relay(&self) -> Option<ContextId> {
        self.relay
            .as_ref()
            .filter(|shared| shared.is_armed())
            .map(|shared| shared.context())
    }

    fn discard_context(&mut self) {
        self.relay = None;
        if let Some(mut loaded) = self.current.take() {
            loaded.handle.abandon();
        }
    }
}

impl fmt::Debug for ExecutionContextHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContextHost")
            .field("current", &self.current_context())
            .field("armed", &self.is_armed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
