// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! livepad
//!
//! A markup/style/script playground engine. Three authored fragments are
//! synthesized into one instrumented document, which runs in an isolated
//! QuickJS context on its own thread. Console calls and uncaught failures
//! inside the context come back across a typed mailbox as telemetry events
//! and are relayed to a host sink, one relay per context.
//!
//! - [`synth`] builds the document.
//! - [`sandbox`] hosts the context.
//! - [`relay`] forwards its telemetry.
//! - [`controller`] runs the teardown, load and arm cycle.
//!
//! Fragment persistence, share tokens and export bundles back the CLI.
#![doc = include_str!("../README.md")]

pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod env;
pub mod export;
pub mod fragments;
pub mod output;
pub mod relay;
pub mod sandbox;
pub mod share;
pub mod state;
pub mod synth;

pub use livepad_telemetry as telemetry;
