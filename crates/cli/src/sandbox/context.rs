// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One isolated execution context: a QuickJS runtime on its own thread.
//!
//! The thread evaluates the document's script blocks, drains promise jobs
//! and then runs timers until none remain, a budget runs out, or the host
//! abandons the context. The only way out of the context is the [`Port`].

use super::surface::{ScriptBlock, Surface};
use super::{ContextId, HostError};
use crate::config::SandboxConfig;
use crate::relay::Port;
use regex::Regex;
use rquickjs::{CatchResultExt, CaughtError, Coerced, Context, Ctx, Function, Runtime, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, LazyLock};
use std::thread;
use std::time::{Duration, Instant};

const BOOTSTRAP: &str = include_str!("bootstrap.js");

/// Source reported to `window.onerror` for inline scripts.
const DOCUMENT_SOURCE: &str = "about:srcdoc";

static STACK_POSITION_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m):(\d+)(?::(\d+))?\)?\s*$").ok());

/// Host-side handle to a running context.
///
/// Dropping the handle abandons the context. The thread is never joined:
/// it observes the abandoned flag from the interrupt handler and its timer
/// wait, and exits on its own.
pub(crate) struct ContextHandle {
    id: ContextId,
    abandoned: Arc<AtomicBool>,
    shutdown: Option<mpsc::Sender<()>>,
}

impl ContextHandle {
    pub(crate) fn spawn(
        id: ContextId,
        surface: &Surface,
        config: &SandboxConfig,
        port: Port,
    ) -> Result<Self, HostError> {
        let abandoned = Arc::new(AtomicBool::new(false));
        let (shutdown, shutdown_rx) = mpsc::channel();
        let worker = Worker {
            id,
            scripts: surface.scripts.clone(),
            element_ids: surface.element_ids.clone(),
            config: config.clone(),
            port,
            abandoned: Arc::clone(&abandoned),
            shutdown: shutdown_rx,
        };
        thread::Builder::new()
            .name(format!("livepad-context-{id}"))
            .spawn(move || worker.run())
            .map_err(HostError::Spawn)?;

        Ok(Self {
            id,
            abandoned,
            shutdown: Some(shutdown),
        })
    }

    pub(crate) fn id(&self) -> ContextId {
        self.id
    }

    /// Halt running script and cancel pending timers. Idempotent.
    pub(crate) fn abandon(&mut self) {
        if self.abandoned.swap(true, Ordering::SeqCst) {
            return;
        }
        self.shutdown = None;
        tracing::debug!(context = %self.id, "context.abandoned");
    }
}

impl Drop for ContextHandle {
    fn drop(&mut self) {
        self.abandon();
    }
}

struct Worker {
    id: ContextId,
    scripts: Vec<ScriptBlock>,
    element_ids: Vec<String>,
    config: SandboxConfig,
    port: Port,
    abandoned: Arc<AtomicBool>,
    shutdown: mpsc::Receiver<()>,
}

/// Why the timer loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Idle,
    Abandoned,
    TimerBudget,
    Lifetime,
}

impl Worker {
    fn run(self) {
        let id = self.id;
        match self.execute() {
            Ok(exit) => tracing::debug!(context = %id, ?exit, "context.finished"),
            Err(err) => tracing::warn!(context = %id, error = %err, "context failed to start"),
        }
    }

    fn execute(self) -> rquickjs::Result<Exit> {
        let started = Instant::now();
        let rt = Runtime::new()?;
        rt.set_memory_limit(self.config.memory_limit_bytes);
        rt.set_max_stack_size(self.config.max_stack_bytes);
        let flag = Arc::clone(&self.abandoned);
        rt.set_interrupt_handler(Some(Box::new(move || flag.load(Ordering::Relaxed))));

        let context = Context::full(&rt)?;
        context.with(|ctx| install(&ctx, self.id, self.port.clone(), started, &self.element_ids))?;

        for block in &self.scripts {
            if self.is_abandoned() {
                return Ok(Exit::Abandoned);
            }
            context.with(|ctx| {
                let result = ctx.eval::<(), _>(block.positioned_source()).catch(&ctx);
                if let Err(caught) = result {
                    if !self.is_abandoned() {
                        report_uncaught(&ctx, self.id, caught, block.line);
                    }
                }
            });
            self.drain_jobs(&rt);
        }

        self.run_timers(&rt, &context, started)
    }

    fn run_timers(&self, rt: &Runtime, context: &Context, started: Instant) -> rquickjs::Result<Exit> {
        let lifetime = self.config.max_lifetime_ms as f64;
        let mut fired: u32 = 0;
        loop {
            if self.is_abandoned() {
                return Ok(Exit::Abandoned);
            }
            let due: f64 = context.with(|ctx| call_global(&ctx, "__livepad_next_timer"))?;
            if due < 0.0 {
                return Ok(Exit::Idle);
            }
            if fired >= self.config.timer_budget {
                tracing::warn!(context = %self.id, budget = self.config.timer_budget, "timer budget exhausted");
                return Ok(Exit::TimerBudget);
            }
            let now = elapsed_ms(started);
            if now >= lifetime {
                tracing::debug!(context = %self.id, "context lifetime exhausted");
                return Ok(Exit::Lifetime);
            }
            if due > now {
                let wait = Duration::from_secs_f64((due.min(lifetime) - now) / 1000.0);
                match self.shutdown.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => return Ok(Exit::Abandoned),
                }
            }

            context.with(|ctx| {
                let result = call_global::<()>(&ctx, "__livepad_fire_timer").catch(&ctx);
                if let Err(caught) = result {
                    if !self.is_abandoned() {
                        report_uncaught(&ctx, self.id, caught, 0);
                    }
                }
            });
            fired += 1;
            self.drain_jobs(rt);
        }
    }

    fn drain_jobs(&self, rt: &Runtime) {
        while rt.is_job_pending() && !self.is_abandoned() {
            if rt.execute_pending_job().is_err() {
                tracing::debug!(context = %self.id, "promise job threw");
            }
        }
    }

    fn is_abandoned(&self) -> bool {
        self.abandoned.load(Ordering::Relaxed)
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

fn call_global<'js, T: rquickjs::FromJs<'js>>(ctx: &Ctx<'js>, name: &str) -> rquickjs::Result<T> {
    let function: Function = ctx.globals().get(name)?;
    function.call(())
}

/// Install the native bindings and the platform shim.
fn install(
    ctx: &Ctx<'_>,
    id: ContextId,
    port: Port,
    started: Instant,
    element_ids: &[String],
) -> rquickjs::Result<()> {
    let globals = ctx.globals();

    let post = Function::new(ctx.clone(), move |payload: String| {
        port.post(payload);
    })?
    .with_name("__livepad_post")?;
    globals.set("__livepad_post", post)?;

    let console = Function::new(ctx.clone(), move |level: String, text: String| {
        native_console(id, &level, &text);
    })?
    .with_name("__livepad_console")?;
    globals.set("__livepad_console", console)?;

    let clock = Function::new(ctx.clone(), move || elapsed_ms(started))?.with_name("__livepad_clock")?;
    globals.set("__livepad_clock", clock)?;

    let bootstrap: Function = ctx.eval(BOOTSTRAP)?;
    bootstrap.call::<_, ()>((element_ids.to_vec(),))?;
    Ok(())
}

/// The context's own console: visible in the host log only.
fn native_console(id: ContextId, level: &str, text: &str) {
    match level {
        "warn" | "error" | "alert" => {
            tracing::info!(target: "livepad::sandbox", context = %id, level, "{text}")
        }
        _ => tracing::debug!(target: "livepad::sandbox", context = %id, level, "{text}"),
    }
}

/// Failure details pulled out of a caught exception.
struct Failure<'js> {
    message: String,
    line: u32,
    column: u32,
    error: Option<Value<'js>>,
}

fn describe_failure(caught: CaughtError<'_>, fallback_line: u32) -> Failure<'_> {
    match caught {
        CaughtError::Exception(exception) => {
            let name: Option<String> = exception.get("name").ok().flatten();
            let text = exception.message().unwrap_or_default();
            let (line, column) = exception_position(&exception, fallback_line);
            Failure {
                message: match name {
                    Some(name) if !name.is_empty() => format!("Uncaught {name}: {text}"),
                    _ => format!("Uncaught {text}"),
                },
                line,
                column,
                error: Some(exception.into_object().into_value()),
            }
        }
        CaughtError::Value(value) => {
            let text = value
                .get::<Coerced<String>>()
                .map(|coerced| coerced.0)
                .unwrap_or_else(|_| "exception".to_string());
            Failure {
                message: format!("Uncaught {text}"),
                line: fallback_line,
                column: 0,
                error: Some(value),
            }
        }
        CaughtError::Error(err) => Failure {
            message: format!("Uncaught InternalError: {err}"),
            line: fallback_line,
            column: 0,
            error: None,
        },
    }
}

fn exception_position(exception: &rquickjs::Exception<'_>, fallback_line: u32) -> (u32, u32) {
    let line: Option<u32> = exception.get("lineNumber").ok().flatten();
    let column: Option<u32> = exception.get("columnNumber").ok().flatten();
    if let Some(line) = line {
        return (line, column.unwrap_or(0));
    }
    exception
        .stack()
        .and_then(|stack| parse_stack_position(&stack))
        .unwrap_or((fallback_line, 0))
}

fn parse_stack_position(stack: &str) -> Option<(u32, u32)> {
    let caps = STACK_POSITION_REGEX.as_ref()?.captures(stack)?;
    let line = caps.get(1)?.as_str().parse().ok()?;
    let column = caps
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    Some((line, column))
}

/// Hand an uncaught failure to `window.onerror`. When there is no handler,
/// or it does not return `true`, the failure gets the native presentation.
fn report_uncaught<'js>(ctx: &Ctx<'js>, id: ContextId, caught: CaughtError<'js>, fallback_line: u32) {
    let failure = describe_failure(caught, fallback_line);
    let handler: Option<Function> = ctx.globals().get("onerror").ok().flatten();
    let handled = match handler {
        Some(handler) => {
            let error = failure
                .error
                .clone()
                .unwrap_or_else(|| Value::new_undefined(ctx.clone()));
            let result = handler
                .call::<_, Value>((
                    failure.message.clone(),
                    DOCUMENT_SOURCE,
                    failure.line,
                    failure.column,
                    error,
                ))
                .catch(ctx);
            matches!(result, Ok(value) if value.as_bool() == Some(true))
        }
        None => false,
    };
    if !handled {
        tracing::warn!(
            target: "livepad::sandbox",
            context = %id,
            line = failure.line,
            column = failure.column,
            "{}",
            failure.message
        );
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
