// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const PRE_FAILS: &str =
    r#"[{"pre": ["false"], "cmd": "sh -c 'echo main'"}, {"cmd": "sh -c 'echo next'"}]"#;

#[tokio::test]
async fn failed_pre_stops_job_but_archives() {
    let q = TestQueue::new();
    let pending = q.submit("prep", PRE_FAILS);

    let outcome = q.runner(ErrorPolicy::Break, SetupFailure::Archive).handle(&pending).await.unwrap();

    assert!(matches!(outcome, JobOutcome::Archived(_)), "got {outcome:?}");
    let unpacked = q.unpack("prep");
    let job = unpacked.path().join("prep");
    let doc = archived_doc(unpacked.path(), "prep");
    assert_eq!(
        doc.entries[0].error,
        vec!["pre command failed".to_string(), "command `false` exited with code 1".to_string()]
    );
    assert!(!job.join("1").join("out").exists(), "main command must not run");
    assert!(!job.join("2").exists(), "later entries must not run");
}

#[tokio::test]
async fn failed_pre_can_be_recorded() {
    let q = TestQueue::new();
    let pending = q.submit("prep", PRE_FAILS);

    let outcome = q.runner(ErrorPolicy::Break, SetupFailure::Record).handle(&pending).await.unwrap();

    assert_eq!(outcome, JobOutcome::Errored(q.queue.error_record_path("prep")));
    let record = q.record("prep");
    assert_eq!(record.error[0], "pre command failed");
    assert_eq!(record.body.get("pre"), Some(&serde_json::json!(["false"])));
    assert!(q.queue.list(QueueState::Finished).unwrap().is_empty());
}

#[tokio::test]
async fn setup_failure_ignores_continue_policy() {
    let q = TestQueue::new();
    let pending = q.submit("prep", PRE_FAILS);

    q.runner(ErrorPolicy::Continue, SetupFailure::Archive).handle(&pending).await.unwrap();

    let unpacked = q.unpack("prep");
    assert!(!unpacked.path().join("prep").join("2").exists());
}

#[tokio::test]
async fn missing_log_file_is_a_setup_failure() {
    let q = TestQueue::new();
    let pending =
        q.submit("nolog", r#"[{"cmd": "sh -c 'echo main'", "log": "/nonexistent/app.log"}]"#);

    let outcome = q.runner(ErrorPolicy::Break, SetupFailure::Archive).handle(&pending).await.unwrap();

    assert!(matches!(outcome, JobOutcome::Archived(_)), "got {outcome:?}");
    let unpacked = q.unpack("nolog");
    let doc = archived_doc(unpacked.path(), "nolog");
    assert_eq!(doc.entries[0].error, vec!["File does not exist: /nonexistent/app.log".to_string()]);
    assert!(!unpacked.path().join("nolog").join("1").join("out").exists());
}

#[tokio::test]
async fn shrunk_log_is_annotated_but_recoverable() {
    let q = TestQueue::new();
    let work = tempfile::tempdir().unwrap();
    let log = work.path().join("rotating.log");
    std::fs::write(&log, "a fairly long line of existing log output\n").unwrap();
    let cmd = format!("sh -c 'echo new > {}'", log.display());
    let json = serde_json::json!([{ "cmd": cmd, "log": log }, { "cmd": "sh -c 'echo next'" }])
        .to_string();
    let pending = q.submit("rotated", &json);

    let outcome = q.runner(ErrorPolicy::Break, SetupFailure::Archive).handle(&pending).await.unwrap();

    assert!(matches!(outcome, JobOutcome::Archived(_)), "got {outcome:?}");
    let unpacked = q.unpack("rotated");
    let job = unpacked.path().join("rotated");
    let doc = archived_doc(unpacked.path(), "rotated");
    assert!(doc.entries[0].has_errors());
    assert!(!job.join("1").join("log").exists());
    assert_eq!(read(&job.join("2").join("out")), "next\n");
}
