// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use rstest::rstest;

fn p(path: &str) -> Option<PathBuf> {
    Some(PathBuf::from(path))
}

#[rstest]
#[case::explicit_wins(p("/cli"), p("/env"), p("/cfg"), p("/home"), "/cli")]
#[case::env_over_config(None, p("/env"), p("/cfg"), p("/home"), "/env")]
#[case::config_over_home(None, None, p("/cfg"), p("/home"), "/cfg")]
#[case::home_fallback(None, None, None, p("/home"), "/home/.livepad")]
fn test_resolve_precedence(
    #[case] explicit: Option<PathBuf>,
    #[case] from_env: Option<PathBuf>,
    #[case] configured: Option<PathBuf>,
    #[case] home: Option<PathBuf>,
    #[case] expected: &str,
) {
    let dir = StateDirectory::resolve_from(explicit, from_env, configured, home).unwrap();
    assert_eq!(dir.root(), Path::new(expected));
}

#[test]
fn test_resolve_without_any_source_fails() {
    let err = StateDirectory::resolve_from(None, None, None, None).unwrap_err();
    assert!(matches!(err, StateError::NoHome));
}

#[test]
fn test_initialize_creates_directory() {
    let temp = tempfile::tempdir().unwrap();
    let dir = StateDirectory::new(temp.path().join("nested").join("state"));
    dir.initialize().unwrap();
    assert!(dir.root().is_dir());

    // Second call is a no-op
    dir.initialize().unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(dir.root()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }
}

#[test]
fn test_paths_delegate() {
    let dir = StateDirectory::new("/state");
    assert_eq!(
        dir.fragment_path(FragmentKind::Script),
        PathBuf::from("/state/playground-js.json")
    );
    assert_eq!(dir.config_path(), PathBuf::from("/state/config.toml"));
    assert_eq!(dir.paths().root(), Path::new("/state"));
}
