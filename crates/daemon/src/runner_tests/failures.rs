// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const TWO_STEPS: &str = r#"[{"cmd": "false"}, {"cmd": "sh -c 'echo second'"}]"#;

#[tokio::test]
async fn break_records_failing_entry_and_stops() {
    let q = TestQueue::new();
    let pending = q.submit("broken", TWO_STEPS);

    let outcome = q.runner(ErrorPolicy::Break, SetupFailure::Archive).handle(&pending).await.unwrap();

    assert_eq!(outcome, JobOutcome::Errored(q.queue.error_record_path("broken")));
    similar_asserts::assert_eq!(
        serde_json::to_value(q.record("broken")).unwrap(),
        serde_json::json!({"cmd": "false", "error": ["command `false` exited with code 1"]})
    );

    assert!(!pending.exists());
    assert!(q.queue.list(QueueState::Finished).unwrap().is_empty());
    assert!(!q.dir(QueueState::Running).join("broken").exists());

    let kept = q.dir(QueueState::Error).join("broken.d");
    assert!(kept.join("1").is_dir());
    assert!(!kept.join("2").exists());
}

#[tokio::test]
async fn continue_annotates_and_archives() {
    let q = TestQueue::new();
    let pending = q.submit("lenient", TWO_STEPS);

    let outcome =
        q.runner(ErrorPolicy::Continue, SetupFailure::Archive).handle(&pending).await.unwrap();

    assert!(matches!(outcome, JobOutcome::Archived(_)), "got {outcome:?}");
    assert!(q.queue.list(QueueState::Error).unwrap().is_empty());

    let unpacked = q.unpack("lenient");
    let doc = archived_doc(unpacked.path(), "lenient");
    assert_eq!(doc.entries[0].error, vec!["command `false` exited with code 1".to_string()]);
    assert!(!doc.entries[1].has_errors());
    assert_eq!(read(&unpacked.path().join("lenient").join("2").join("out")), "second\n");
}

#[tokio::test]
async fn unparseable_job_is_recorded_without_running() {
    let q = TestQueue::new();
    let pending = q.submit("garbage", "{ not json");

    let outcome = q.runner(ErrorPolicy::Break, SetupFailure::Archive).handle(&pending).await.unwrap();

    assert_eq!(outcome, JobOutcome::Errored(q.queue.error_record_path("garbage")));
    let record = q.record("garbage");
    assert!(record.body.is_empty());
    assert!(record.error[0].starts_with("JSON failed to parse job file"), "{:?}", record.error);
    assert!(record.error.len() > 1);
    assert!(!pending.exists());
    assert!(!q.dir(QueueState::Running).join("garbage").exists());
    assert!(!q.dir(QueueState::Error).join("garbage.d").exists());
}

#[tokio::test]
async fn missing_program_is_a_command_failure() {
    let q = TestQueue::new();
    let pending = q.submit("ghost", r#"[{"cmd": "/nonexistent/program"}]"#);

    q.runner(ErrorPolicy::Break, SetupFailure::Archive).handle(&pending).await.unwrap();

    let record = q.record("ghost");
    assert!(record.error[0].starts_with("failed to start `/nonexistent/program`"));
}

#[tokio::test]
async fn error_record_replaces_previous_one() {
    let q = TestQueue::new();
    let runner = q.runner(ErrorPolicy::Break, SetupFailure::Archive);

    let pending = q.submit("twice", r#"[{"cmd": "sh -c 'exit 2'"}]"#);
    runner.handle(&pending).await.unwrap();
    let pending = q.submit("twice", r#"[{"cmd": "sh -c 'exit 5'"}]"#);
    runner.handle(&pending).await.unwrap();

    let record = q.record("twice");
    assert_eq!(record.error, vec!["command `sh -c 'exit 5'` exited with code 5".to_string()]);
}

#[test]
fn marker_names_are_not_jobs() {
    assert!(matches!(job_name(Path::new("/q/j/p/.partial")), Err(JobError::BadName(_))));
    assert_eq!(job_name(Path::new("/q/j/p/nightly")).unwrap(), "nightly");
}
