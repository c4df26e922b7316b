// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sample() -> Vec<(QueueState, Vec<String>)> {
    vec![
        (QueueState::Pending, vec!["a".to_string(), "b".to_string()]),
        (QueueState::Finished, vec!["c.tar.gz".to_string()]),
    ]
}

#[test]
fn text_groups_by_state() {
    assert_eq!(
        render(&sample(), false, false).unwrap(),
        "pending:\n  a\n  b\nfinished:\n  c.tar.gz\n"
    );
}

#[test]
fn single_state_text_is_bare_names() {
    let listing = vec![(QueueState::Error, vec!["x".to_string()])];
    assert_eq!(render(&listing, true, false).unwrap(), "x\n");
}

#[test]
fn json_keys_by_state() {
    let out = render(&sample(), false, true).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value, serde_json::json!({"pending": ["a", "b"], "finished": ["c.tar.gz"]}));
}

#[test]
fn single_state_json_is_array() {
    let listing = vec![(QueueState::Running, vec![])];
    let value: serde_json::Value =
        serde_json::from_str(&render(&listing, true, true).unwrap()).unwrap();
    assert_eq!(value, serde_json::json!([]));
}

#[test]
fn missing_directory_lists_nothing() {
    let home = tempfile::tempdir().unwrap();
    let queue = DirectoryQueue::new(home.path().join("absent"));
    assert!(visible(&queue, QueueState::Pending).unwrap().is_empty());
    assert!(!home.path().join("absent").exists());
}
