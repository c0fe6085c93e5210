// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The host-side event callback contract.

use crate::event::TelemetryEvent;

/// Receives telemetry events relayed out of a sandbox.
///
/// Called zero or more times per run, always from the relay's forwarding
/// task and never concurrently for the same sink. A sink must not dispose
/// the relay that is delivering to it.
pub trait TelemetrySink: Send + 'static {
    fn on_event(&mut self, event: TelemetryEvent);
}

impl<F> TelemetrySink for F
where
    F: FnMut(TelemetryEvent) + Send + 'static,
{
    fn on_event(&mut self, event: TelemetryEvent) {
        self(event)
    }
}
