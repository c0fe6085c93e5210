// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use yare::parameterized;

#[test]
fn test_parse_run_defaults() {
    let cli = Cli::try_parse_from(["livepad", "run"]).unwrap();
    let Command::Run(args) = cli.command else {
        panic!("expected run");
    };
    assert_eq!(args.format, OutputFormat::Text);
    assert_eq!(args.settle_ms, DEFAULT_SETTLE_MS);
    assert!(args.capture.is_none());
    assert!(args.sources.markup.is_none());
}

#[test]
fn test_parse_run_with_overrides() {
    let cli = Cli::try_parse_from([
        "livepad",
        "run",
        "--script",
        "app.js",
        "--format",
        "json",
        "--settle-ms",
        "150",
        "--capture",
        "console.jsonl",
    ])
    .unwrap();
    let Command::Run(args) = cli.command else {
        panic!("expected run");
    };
    assert_eq!(
        args.sources.file_for(FragmentKind::Script),
        Some(&PathBuf::from("app.js"))
    );
    assert_eq!(args.sources.file_for(FragmentKind::Style), None);
    assert_eq!(args.format, OutputFormat::Json);
    assert_eq!(args.settle_ms, 150);
    assert_eq!(args.capture, Some(PathBuf::from("console.jsonl")));
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "livepad",
        "reset",
        "--state-dir",
        "/tmp/pad",
        "--config",
        "/tmp/pad.toml",
        "-v",
    ])
    .unwrap();
    assert!(matches!(cli.command, Command::Reset));
    assert_eq!(cli.state_dir, Some(PathBuf::from("/tmp/pad")));
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/pad.toml")));
    assert!(cli.verbose);
}

#[parameterized(
    markup = { "markup", FragmentKind::Markup },
    html = { "html", FragmentKind::Markup },
    css = { "css", FragmentKind::Style },
    js = { "js", FragmentKind::Script },
    javascript = { "javascript", FragmentKind::Script },
)]
fn test_parse_kind_aliases(arg: &str, expected: FragmentKind) {
    let cli = Cli::try_parse_from(["livepad", "show", arg]).unwrap();
    let Command::Show { kind } = cli.command else {
        panic!("expected show");
    };
    assert_eq!(kind, expected);
}

#[test]
fn test_set_defaults_to_stdin() {
    let cli = Cli::try_parse_from(["livepad", "set", "css"]).unwrap();
    let Command::Set { kind, file } = cli.command else {
        panic!("expected set");
    };
    assert_eq!(kind, FragmentKind::Style);
    assert_eq!(file, PathBuf::from("-"));
}

#[test]
fn test_unknown_kind_is_rejected() {
    assert!(Cli::try_parse_from(["livepad", "show", "python"]).is_err());
}

#[test]
fn test_subcommand_is_required() {
    assert!(Cli::try_parse_from(["livepad"]).is_err());
}
