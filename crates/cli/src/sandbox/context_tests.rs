// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::relay::{channel, RelaySession};
use livepad_telemetry::{ConsoleLog, Severity};

const SETTLE: Duration = Duration::from_secs(10);

/// Spawn a context for `doc` and collect every message it posts until it exits.
async fn run_document(doc: &str, config: SandboxConfig) -> ConsoleLog {
    let id = ContextId::new(1);
    let surface = Surface::parse(doc);
    let (port, inbox) = channel(id);
    let handle = ContextHandle::spawn(id, &surface, &config, port).unwrap();
    let log = ConsoleLog::new();
    let mut session = RelaySession::arm(inbox, log.clone()).unwrap();
    tokio::time::timeout(SETTLE, session.drained())
        .await
        .expect("context did not finish");
    drop(handle);
    log
}

fn script(body: &str) -> String {
    format!("<html><body><p id=\"out\"></p>\n<script>\n{body}\n</script></body></html>")
}

fn post(kind: &str, expr: &str) -> String {
    format!("parent.postMessage({{ type: '{kind}', message: String({expr}) }}, '*');")
}

#[tokio::test(flavor = "current_thread")]
async fn test_post_message_reaches_relay() {
    let log = run_document(&script(&post("info", "'hello'")), SandboxConfig::default()).await;
    assert_eq!(log.messages(), vec!["hello"]);
    assert_eq!(log.events()[0].kind(), Severity::Info);
}

#[tokio::test(flavor = "current_thread")]
async fn test_script_blocks_run_in_document_order() {
    let doc = format!(
        "<head><script>{}</script></head><body><script>{}</script><script>{}</script></body>",
        post("log", "'head'"),
        post("log", "'first'"),
        post("log", "'second'")
    );
    let log = run_document(&doc, SandboxConfig::default()).await;
    assert_eq!(log.messages(), vec!["head", "first", "second"]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_timers_fire_in_due_order() {
    let body = format!(
        "setTimeout(function () {{ {} }}, 30);\nsetTimeout(function () {{ {} }}, 5);\n{}",
        post("log", "'late'"),
        post("log", "'early'"),
        post("log", "'sync'")
    );
    let log = run_document(&script(&body), SandboxConfig::default()).await;
    assert_eq!(log.messages(), vec!["sync", "early", "late"]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_cleared_timer_never_fires() {
    let body = format!(
        "var t = setTimeout(function () {{ {} }}, 5);\nclearTimeout(t);\nsetTimeout(function () {{ {} }}, 10);",
        post("log", "'cancelled'"),
        post("log", "'kept'")
    );
    let log = run_document(&script(&body), SandboxConfig::default()).await;
    assert_eq!(log.messages(), vec!["kept"]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_interval_runs_until_cleared() {
    let body = format!(
        "var n = 0;\nvar t = setInterval(function () {{ n++; {} if (n === 3) clearInterval(t); }}, 1);",
        post("log", "n")
    );
    let log = run_document(&script(&body), SandboxConfig::default()).await;
    assert_eq!(log.messages(), vec!["1", "2", "3"]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_timer_budget_stops_runaway_interval() {
    let config = SandboxConfig {
        timer_budget: 4,
        ..SandboxConfig::default()
    };
    let body = format!("setInterval(function () {{ {} }}, 1);", post("log", "'tick'"));
    let log = run_document(&script(&body), config).await;
    assert_eq!(log.len(), 4);
}

#[tokio::test(flavor = "current_thread")]
async fn test_lifetime_stops_pending_timers() {
    let config = SandboxConfig {
        max_lifetime_ms: 50,
        ..SandboxConfig::default()
    };
    let body = format!("setTimeout(function () {{ {} }}, 60000);", post("log", "'never'"));
    let log = run_document(&script(&body), config).await;
    assert!(log.is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn test_promise_jobs_run_before_timers() {
    let body = format!(
        "setTimeout(function () {{ {} }}, 0);\nPromise.resolve().then(function () {{ {} }});",
        post("log", "'timer'"),
        post("log", "'microtask'")
    );
    let log = run_document(&script(&body), SandboxConfig::default()).await;
    assert_eq!(log.messages(), vec!["microtask", "timer"]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_uncaught_error_goes_to_onerror_with_position() {
    let body = "window.onerror = function (message, source, line, col, error) {\n  parent.postMessage({ type: 'error', message: message + ' @' + line + ' ' + source + ' ' + (error instanceof Error) }, '*');\n  return true;\n};\nmissingFunction();";
    let log = run_document(&script(body), SandboxConfig::default()).await;

    let messages = log.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Uncaught ReferenceError:"), "{}", messages[0]);
    assert!(messages[0].contains("missingFunction"));
    assert!(messages[0].ends_with("@7 about:srcdoc true"), "{}", messages[0]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_uncaught_error_without_handler_posts_nothing() {
    let log = run_document(&script("throw new Error('quiet');"), SandboxConfig::default()).await;
    assert!(log.is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn test_later_blocks_run_after_a_failing_block() {
    let doc = format!(
        "<body><script>throw 1;</script><script>{}</script></body>",
        post("log", "'still running'")
    );
    let log = run_document(&doc, SandboxConfig::default()).await;
    assert_eq!(log.messages(), vec!["still running"]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_document_exposes_known_elements_only() {
    let body = format!(
        "{}\n{}",
        post("log", "document.getElementById('out') !== null"),
        post("log", "document.querySelector('#nope') === null")
    );
    let log = run_document(&script(&body), SandboxConfig::default()).await;
    assert_eq!(log.messages(), vec!["true", "true"]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_element_click_dispatches_listeners() {
    let body = format!(
        "var el = document.getElementById('out');\nel.addEventListener('click', function () {{ {} }});\nel.click();",
        post("log", "'clicked'")
    );
    let log = run_document(&script(&body), SandboxConfig::default()).await;
    assert_eq!(log.messages(), vec!["clicked"]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_parent_cannot_be_reassigned() {
    let body = format!("window.parent = {{ postMessage: function () {{}} }};\n{}", post("log", "'through'"));
    let log = run_document(&script(&body), SandboxConfig::default()).await;
    assert_eq!(log.messages(), vec!["through"]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_no_host_capabilities_are_exposed() {
    let body = post(
        "log",
        "[typeof require, typeof process, typeof fetch, typeof XMLHttpRequest, typeof __livepad_post].join(',')",
    );
    let log = run_document(&script(&body), SandboxConfig::default()).await;
    assert_eq!(
        log.messages(),
        vec!["undefined,undefined,undefined,undefined,undefined"]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_abandon_halts_runaway_script() {
    let id = ContextId::new(2);
    let surface = Surface::parse("<script>while (true) {}</script>");
    let (port, inbox) = channel(id);
    let mut handle = ContextHandle::spawn(id, &surface, &SandboxConfig::default(), port).unwrap();
    let mut session = RelaySession::arm(inbox, ConsoleLog::new()).unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.abandon();
    handle.abandon();

    tokio::time::timeout(SETTLE, session.drained())
        .await
        .expect("abandoned context kept running");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_abandon_cancels_pending_timers() {
    let id = ContextId::new(3);
    let doc = script(&format!("setTimeout(function () {{ {} }}, 5000);", post("log", "'late'")));
    let surface = Surface::parse(&doc);
    let (port, inbox) = channel(id);
    let handle = ContextHandle::spawn(id, &surface, &SandboxConfig::default(), port).unwrap();
    let log = ConsoleLog::new();
    let mut session = RelaySession::arm(inbox, log.clone()).unwrap();

    drop(handle);
    tokio::time::timeout(Duration::from_secs(2), session.drained())
        .await
        .expect("timer wait was not woken");
    assert!(log.is_empty());
}

#[test]
fn test_parse_stack_position() {
    assert_eq!(
        parse_stack_position("    at <eval> (eval_script:12:5)\n"),
        Some((12, 5))
    );
    assert_eq!(parse_stack_position("    at <eval> (eval_script:3)\n"), Some((3, 0)));
    assert_eq!(parse_stack_position("    at eval_script:8:14\n"), Some((8, 14)));
    assert_eq!(parse_stack_position("    at <native>\n"), None);
}
