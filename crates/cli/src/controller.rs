// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run controller: teardown-previous, synthesize, load, arm-relay.

use crate::fragments::Fragments;
use crate::relay::{RelayError, RelaySession};
use crate::sandbox::{ContextId, ExecutionContextHost, HostError};
use crate::synth::synthesize_fragments;
use livepad_telemetry::TelemetrySink;
use std::time::Duration;
use thiserror::Error;

/// Errors from starting a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Relay(#[from] RelayError),
}

/// Observable phase of the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Loading,
    Running,
}

enum RunState {
    Idle,
    Loading { context: Option<ContextId> },
    Running { context: ContextId, session: RelaySession },
}

impl RunState {
    fn phase(&self) -> RunPhase {
        match self {
            RunState::Idle => RunPhase::Idle,
            RunState::Loading { .. } => RunPhase::Loading,
            RunState::Running { .. } => RunPhase::Running,
        }
    }
}

/// Orchestrates runs against one host, delivering every run's events to
/// clones of the same sink.
pub struct RunController<S> {
    host: ExecutionContextHost,
    sink: S,
    state: RunState,
}

impl<S> RunController<S>
where
    S: TelemetrySink + Clone,
{
    pub fn new(host: ExecutionContextHost, sink: S) -> Self {
        Self {
            host,
            sink,
            state: RunState::Idle,
        }
    }

    /// Start a fresh run of `fragments`.
    ///
    /// Returns as soon as the context is spawned and the relay armed. Events
    /// from any earlier run can no longer reach the sink once this returns.
    pub fn run(&mut self, fragments: &Fragments) -> Result<ContextId, RunError> {
        self.dispose();

        let doc = synthesize_fragments(fragments);
        self.state = RunState::Loading { context: None };
        let context = match self.host.load(&doc) {
            Ok(context) => context,
            Err(err) => return Err(self.fail(err.into())),
        };
        self.state = RunState::Loading {
            context: Some(context),
        };
        let session = match self.host.arm(self.sink.clone()) {
            Ok(session) => session,
            Err(err) => return Err(self.fail(err.into())),
        };

        tracing::info!(context = %context, "run.started");
        self.state = RunState::Running { context, session };
        Ok(context)
    }

    /// Full teardown and rebuild; identical to [`RunController::run`].
    pub fn refresh(&mut self, fragments: &Fragments) -> Result<ContextId, RunError> {
        self.run(fragments)
    }

    /// Dispose the relay and discard the context. Idempotent.
    pub fn dispose(&mut self) {
        match std::mem::replace(&mut self.state, RunState::Idle) {
            RunState::Idle => {}
            RunState::Loading { .. } => self.host.discard(),
            RunState::Running {
                context,
                mut session,
            } => {
                session.dispose();
                self.host.discard();
                tracing::info!(
                    context = %context,
                    delivered = session.delivered(),
                    dropped = session.dropped(),
                    "run.disposed"
                );
            }
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase()
    }

    pub fn current_context(&self) -> Option<ContextId> {
        match &self.state {
            RunState::Idle => None,
            RunState::Loading { context } => *context,
            RunState::Running { context, .. } => Some(*context),
        }
    }

    /// Wait for the current run's context to finish and its queued events to
    /// reach the sink. Returns `false` if `timeout` elapsed first.
    pub async fn settle(&mut self, timeout: Duration) -> bool {
        match &mut self.state {
            RunState::Running { session, .. } => {
                tokio::time::timeout(timeout, session.drained()).await.is_ok()
            }
            RunState::Idle | RunState::Loading { .. } => true,
        }
    }

    /// Events delivered and payloads dropped by the current run's relay.
    pub fn relay_counts(&self) -> Option<(u64, u64)> {
        match &self.state {
            RunState::Running { session, .. } => Some((session.delivered(), session.dropped())),
            RunState::Idle | RunState::Loading { .. } => None,
        }
    }

    pub fn host(&self) -> &ExecutionContextHost {
        &self.host
    }

    fn fail(&mut self, err: RunError) -> RunError {
        tracing::warn!(error = %err, "run failed");
        self.host.discard();
        self.state = RunState::Idle;
        err
    }
}

impl<S> Drop for RunController<S> {
    fn drop(&mut self) {
        if let RunState::Running { session, .. } = &mut self.state {
            session.dispose();
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
