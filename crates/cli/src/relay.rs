// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Telemetry relay between an isolated context and the host.
//!
//! Each loaded context gets its own one-way mailbox: the context holds the
//! [`Port`] and posts raw wire payloads; the host keeps the [`Inbox`] until a
//! [`RelaySession`] is armed on it. Posting never blocks and never fails from
//! the context's point of view. The session's forwarder task validates each
//! payload and hands the decoded event to the sink, in arrival order.
//!
//! Disposal clears the sink slot under the same lock that guards delivery,
//! so once [`RelaySession::dispose`] returns no further event can reach the
//! sink, whatever is still queued.

use crate::sandbox::ContextId;
use livepad_telemetry::{TelemetryEvent, TelemetrySink};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Errors from arming a relay.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("a relay is already armed for context {0}; dispose it first")]
    AlreadyArmed(ContextId),

    #[error("no document is loaded")]
    NotLoaded,

    #[error("the relay for context {0} was already retired; load a fresh document")]
    Retired(ContextId),

    #[error("arming a relay requires a tokio runtime")]
    NoRuntime,
}

/// One payload as posted by a context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub origin: ContextId,
    pub payload: String,
}

/// Context-side end of the mailbox.
#[derive(Clone, Debug)]
pub struct Port {
    origin: ContextId,
    tx: mpsc::UnboundedSender<Envelope>,
}

impl Port {
    /// Fire-and-forget. A closed mailbox swallows the payload.
    pub fn post(&self, payload: impl Into<String>) {
        let _ = self.tx.send(Envelope {
            origin: self.origin,
            payload: payload.into(),
        });
    }

    pub fn origin(&self) -> ContextId {
        self.origin
    }
}

/// Host-side end of the mailbox.
#[derive(Debug)]
pub struct Inbox {
    context: ContextId,
    rx: mpsc::UnboundedReceiver<Envelope>,
}

impl Inbox {
    pub fn context(&self) -> ContextId {
        self.context
    }
}

/// Create the mailbox for one context.
pub fn channel(context: ContextId) -> (Port, Inbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        Port {
            origin: context,
            tx,
        },
        Inbox { context, rx },
    )
}

/// State shared between a session, its forwarder and the host.
pub(crate) struct SessionShared {
    context: ContextId,
    sink: Mutex<Option<Box<dyn TelemetrySink>>>,
    delivered: AtomicU64,
    dropped: AtomicU64,
}

impl SessionShared {
    pub(crate) fn is_armed(&self) -> bool {
        self.sink.lock().is_some()
    }

    pub(crate) fn context(&self) -> ContextId {
        self.context
    }

    fn deliver(&self, event: TelemetryEvent) -> bool {
        let mut slot = self.sink.lock();
        match slot.as_mut() {
            Some(sink) => {
                sink.on_event(event);
                self.delivered.fetch_add(1, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    fn reject(&self, reason: &str) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(context = %self.context, reason, "relay.dropped");
    }
}

/// The live binding between one loaded context and one sink.
///
/// Dropping the session disposes it.
pub struct RelaySession {
    shared: Arc<SessionShared>,
    forwarder: Option<JoinHandle<()>>,
}

impl RelaySession {
    /// Start forwarding `inbox` to `sink` on the current tokio runtime.
    pub fn arm<S: TelemetrySink>(inbox: Inbox, sink: S) -> Result<Self, RelayError> {
        let handle = Handle::try_current().map_err(|_| RelayError::NoRuntime)?;
        let shared = Arc::new(SessionShared {
            context: inbox.context,
            sink: Mutex::new(Some(Box::new(sink))),
            delivered: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        });
        let forwarder = handle.spawn(forward(inbox, Arc::clone(&shared)));
        tracing::debug!(context = %shared.context, "relay.armed");
        Ok(Self {
            shared,
            forwarder: Some(forwarder),
        })
    }

    pub fn context(&self) -> ContextId {
        self.shared.context
    }

    pub fn is_armed(&self) -> bool {
        self.shared.is_armed()
    }

    /// Events handed to the sink so far.
    pub fn delivered(&self) -> u64 {
        self.shared.delivered.load(Ordering::Relaxed)
    }

    /// Payloads discarded as malformed or foreign.
    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    /// Detach the sink. Idempotent.
    pub fn dispose(&mut self) {
        let detached = self.shared.sink.lock().take();
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
        if detached.is_some() {
            tracing::debug!(
                context = %self.shared.context,
                delivered = self.delivered(),
                dropped = self.dropped(),
                "relay.disposed"
            );
        }
    }

    /// Wait until the context has closed its port and every queued payload
    /// has been forwarded. Returns immediately once disposed.
    pub async fn drained(&mut self) {
        if let Some(forwarder) = self.forwarder.as_mut() {
            let _ = forwarder.await;
            self.forwarder = None;
        }
    }

    pub(crate) fn shared(&self) -> Arc<SessionShared> {
        Arc::clone(&self.shared)
    }
}

impl Drop for RelaySession {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for RelaySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelaySession")
            .field("context", &self.shared.context)
            .field("armed", &self.is_armed())
            .field("delivered", &self.delivered())
            .field("dropped", &self.dropped())
            .finish()
    }
}

async fn forward(mut inbox: Inbox, shared: Arc<SessionShared>) {
    while let Some(envelope) = inbox.rx.recv().await {
        if envelope.origin != inbox.context {
            shared.reject("foreign origin");
            continue;
        }
        match TelemetryEvent::from_wire(&envelope.payload) {
            Ok(event) => {
                if !shared.deliver(event) {
                    break;
                }
            }
            Err(_) => shared.reject("malformed payload"),
        }
    }
}

#[cfg(test)]
#[path = "relay_tests.rs"]
mod tests;
