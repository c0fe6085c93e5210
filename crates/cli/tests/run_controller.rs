// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! End-to-end runs: fragments in, console events out.

use std::time::Duration;

use livepad::config::SandboxConfig;
use livepad::controller::{RunController, RunPhase};
use livepad::fragments::Fragments;
use livepad::sandbox::ExecutionContextHost;
use livepad::telemetry::{ConsoleLog, Severity};

const SETTLE: Duration = Duration::from_secs(10);

fn controller() -> (RunController<ConsoleLog>, ConsoleLog) {
    let log = ConsoleLog::new();
    let host = ExecutionContextHost::new(SandboxConfig::default());
    (RunController::new(host, log.clone()), log)
}

fn script(js: &str) -> Fragments {
    Fragments::new("<div id=\"app\"><h1>Kept</h1></div>", "h1 { color: teal; }", js)
}

async fn run_to_end(js: &str) -> ConsoleLog {
    let (mut controller, log) = controller();
    controller.run(&script(js)).unwrap();
    assert!(controller.settle(SETTLE).await, "run did not settle");
    controller.dispose();
    log
}

mod ordering {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_events_arrive_in_call_order_with_severity() {
        let log = run_to_end(
            "console.log('a');\nconsole.info('b');\nconsole.warn('c');\nconsole.error('d');",
        )
        .await;
        let kinds: Vec<_> = log.events().iter().map(|e| e.kind()).collect();
        assert_eq!(log.messages(), vec!["a", "b", "c", "d"]);
        assert_eq!(
            kinds,
            vec![Severity::Log, Severity::Info, Severity::Warn, Severity::Error]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_timer_and_promise_output_follows_sync_output() {
        let log = run_to_end(
            "setTimeout(() => console.log('timer'), 0);\nPromise.resolve().then(() => console.log('promise'));\nconsole.log('sync');",
        )
        .await;
        assert_eq!(log.messages(), vec!["sync", "promise", "timer"]);
    }
}

mod formatting {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_arguments_are_flattened() {
        let log = run_to_end("console.log('x', { a: 1 });").await;
        assert_eq!(log.messages(), vec!["x {\n  \"a\": 1\n}"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_primitives_join_with_spaces() {
        let log = run_to_end("console.log(1, true, null, undefined, 'str', [1, 2]);").await;
        assert_eq!(
            log.messages(),
            vec!["1 true null undefined str [\n  1,\n  2\n]"]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_error_objects_render_name_and_message() {
        let log = run_to_end("console.error(new RangeError('too far'));").await;
        assert_eq!(log.messages(), vec!["RangeError: too far"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cycles_render_as_circular() {
        let log = run_to_end("var a = { name: 'a' };\na.self = a;\nconsole.log(a);").await;
        assert_eq!(
            log.messages(),
            vec!["{\n  \"name\": \"a\",\n  \"self\": \"[Circular]\"\n}"]
        );
    }
}

mod failures {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_thrown_error_yields_one_error_event() {
        let (mut controller, log) = controller();
        controller
            .run(&script("console.log('before');\nthrow new Error('boom');"))
            .unwrap();
        assert!(controller.settle(SETTLE).await);

        assert_eq!(log.messages(), vec!["before", "boom"]);
        assert_eq!(log.errors().len(), 1);
        let surface = controller.host().surface();
        assert!(surface.body.contains("<h1>Kept</h1>"));
        assert_eq!(surface.styles, vec!["h1 { color: teal; }".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_syntax_error_yields_one_positioned_error_event() {
        let log = run_to_end("console.log('never';").await;
        let errors = log.errors();
        assert_eq!(log.len(), 1);
        assert_eq!(errors.len(), 1);
        let message = errors[0].event.message();
        assert!(message.starts_with("Uncaught SyntaxError"), "{message}");
        assert!(message.contains("(line "), "{message}");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_async_failure_reaches_onerror() {
        let log = run_to_end("setTimeout(function () { undefinedCall(); }, 0);").await;
        let errors = log.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].event.message().contains("undefinedCall"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_malformed_posts_are_dropped() {
        let (mut controller, log) = controller();
        controller
            .run(&script(
                "parent.postMessage('plain', '*');\nparent.postMessage({ type: 'bogus', message: 'x' }, '*');\nparent.postMessage({ type: 'log' }, '*');\nconsole.log('ok');",
            ))
            .unwrap();
        assert!(controller.settle(SETTLE).await);
        assert_eq!(log.messages(), vec!["ok"]);
        assert_eq!(controller.relay_counts(), Some((1, 3)));
    }
}

mod markup {
    use super::*;

    async fn run_fragments(fragments: Fragments) -> ConsoleLog {
        let (mut controller, log) = controller();
        controller.run(&fragments).unwrap();
        assert!(controller.settle(SETTLE).await, "run did not settle");
        controller.dispose();
        log
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_script_tag_in_stylesheet_keeps_instrumentation() {
        let log = run_fragments(Fragments::new(
            "<p>hi</p>",
            "/* <script> tags are not styled */ p { color: red; }",
            "console.log('x');",
        ))
        .await;
        assert_eq!(log.messages(), vec!["x"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_commented_out_script_does_not_run() {
        let log = run_fragments(Fragments::new(
            "<!-- <script>console.log('commented')</script> --><p>hi</p>",
            "",
            "console.log('x');",
        ))
        .await;
        assert_eq!(log.messages(), vec!["x"]);
    }
}

mod lifecycle {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_previous_run_never_bleeds_into_next() {
        let (mut controller, log) = controller();
        controller
            .run(&script(
                "setTimeout(() => console.log('straggler'), 150);\nsetInterval(() => console.log('tick'), 20);",
            ))
            .unwrap();
        let first = controller.current_context();

        controller.run(&script("console.log('second');")).unwrap();
        assert_ne!(controller.current_context(), first);
        assert!(controller.settle(SETTLE).await);
        tokio::time::sleep(Duration::from_millis(300)).await;

        let messages = log.messages();
        assert!(messages.ends_with(&["second".to_string()]), "{messages:?}");
        assert!(!messages.iter().any(|m| m == "straggler"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dispose_is_idempotent_and_stops_delivery() {
        let (mut controller, log) = controller();
        controller
            .run(&script("setInterval(() => console.log('tick'), 5);"))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        controller.dispose();
        controller.dispose();
        assert_eq!(controller.phase(), RunPhase::Idle);

        let seen = log.len();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(log.len(), seen);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_each_run_replays_fresh_globals() {
        let (mut controller, log) = controller();
        let js = "window.count = (window.count || 0) + 1;\nconsole.log(window.count);";
        for _ in 0..3 {
            controller.run(&script(js)).unwrap();
            assert!(controller.settle(SETTLE).await);
        }
        assert_eq!(log.messages(), vec!["1", "1", "1"]);
    }
}
