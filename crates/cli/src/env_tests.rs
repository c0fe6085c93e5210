// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn generated_names_match_variables() {
    assert_eq!(LIVEPAD_CONFIG, "LIVEPAD_CONFIG");
    assert_eq!(LIVEPAD_STATE_DIR, "LIVEPAD_STATE_DIR");
    assert_eq!(LIVEPAD_LOG, "LIVEPAD_LOG");
    assert_eq!(HOME, "HOME");
}

#[test]
fn home_returns_some_value() {
    // HOME is always set in dev/CI environments
    assert!(home().is_some());
}

#[test]
fn unset_variable_reads_as_none() {
    assert_eq!(var_path("LIVEPAD_TEST_SURELY_UNSET_VARIABLE"), None);
}
