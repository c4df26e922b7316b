// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    lower = { "break", ErrorPolicy::Break },
    upper = { "CONTINUE", ErrorPolicy::Continue },
    padded = { " continue\n", ErrorPolicy::Continue },
)]
fn error_policy_parses(input: &str, expected: ErrorPolicy) {
    assert_eq!(input.parse::<ErrorPolicy>().unwrap(), expected);
}

#[parameterized(
    archive = { "archive", SetupFailure::Archive },
    record = { "Record", SetupFailure::Record },
)]
fn setup_failure_parses(input: &str, expected: SetupFailure) {
    assert_eq!(input.parse::<SetupFailure>().unwrap(), expected);
}

#[test]
fn unknown_setting_names_the_choices() {
    let err = "sometimes".parse::<ErrorPolicy>().unwrap_err();
    assert_eq!(err.to_string(), r#"invalid value "sometimes": expected break or continue"#);
}

#[test]
fn default_policy_follows_build_feature() {
    let expected =
        if cfg!(feature = "continue-on-error") { ErrorPolicy::Continue } else { ErrorPolicy::Break };
    assert_eq!(ErrorPolicy::default(), expected);
    assert_eq!(RunnerConfig::default().setup_failure, SetupFailure::Archive);
}

#[test]
fn settings_display_as_env_values() {
    assert_eq!(ErrorPolicy::Continue.to_string(), "continue");
    assert_eq!(SetupFailure::Record.to_string(), "record");
}
