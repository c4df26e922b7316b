// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn exit_error_keeps_its_code() {
    let err = anyhow::Error::new(ExitError::new(3, "no such job"));
    assert_eq!(exit_status(&err), (3, "no such job".to_string()));
}

#[test]
fn other_errors_are_user_errors_with_context() {
    let err = anyhow::anyhow!("permission denied").context("reading job.json");
    assert_eq!(exit_status(&err), (USER_ERROR, "reading job.json: permission denied".to_string()));
}
