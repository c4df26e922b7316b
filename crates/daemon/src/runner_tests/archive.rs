// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn successful_job_is_archived_and_cleared() {
    let q = TestQueue::new();
    let pending = q.submit("hello", r#"[{"cmd": "sh -c 'echo hello'"}]"#);

    let outcome = q.runner(ErrorPolicy::Break, SetupFailure::Archive).handle(&pending).await.unwrap();

    let archive = q.dir(QueueState::Finished).join("hello.tar.gz");
    assert_eq!(outcome, JobOutcome::Archived(archive.clone()));
    assert!(archive.is_file());
    assert!(!pending.exists());
    assert!(!q.dir(QueueState::Running).join("hello").exists());
    assert!(q.queue.list(QueueState::Error).unwrap().is_empty());

    let unpacked = q.unpack("hello");
    let entry_dir = unpacked.path().join("hello").join("1");
    assert_eq!(read(&entry_dir.join("out")), "hello\n");
    assert!(!entry_dir.join("err").exists());
    assert!(!archived_doc(unpacked.path(), "hello").has_errors());
}

#[tokio::test]
async fn every_entry_gets_its_own_directory() {
    let q = TestQueue::new();
    let pending = q.submit(
        "two",
        r#"[{"cmd": "sh -c 'echo first'"}, {"cmd": "sh -c 'echo second >&2'"}]"#,
    );

    q.runner(ErrorPolicy::Break, SetupFailure::Archive).handle(&pending).await.unwrap();

    let unpacked = q.unpack("two");
    let job = unpacked.path().join("two");
    assert_eq!(read(&job.join("1").join("out")), "first\n");
    assert_eq!(read(&job.join("2").join("err")), "second\n");
    assert!(!job.join("2").join("out").exists());
}

#[tokio::test]
async fn pre_and_main_output_share_sinks() {
    let q = TestQueue::new();
    let pending =
        q.submit("pre", r#"[{"pre": ["sh -c 'echo setup'"], "cmd": "sh -c 'echo main'"}]"#);

    q.runner(ErrorPolicy::Break, SetupFailure::Archive).handle(&pending).await.unwrap();

    let unpacked = q.unpack("pre");
    assert_eq!(read(&unpacked.path().join("pre").join("1").join("out")), "setup\nmain\n");
}

#[tokio::test]
async fn env_maps_apply_in_order() {
    let q = TestQueue::new();
    let pending = q.submit(
        "env",
        r#"[{"cmd": "sh -c 'echo $A$B'", "env": [{"A": "1", "B": "2"}, {"B": "3"}]}]"#,
    );

    q.runner(ErrorPolicy::Break, SetupFailure::Archive).handle(&pending).await.unwrap();

    let unpacked = q.unpack("env");
    assert_eq!(read(&unpacked.path().join("env").join("1").join("out")), "13\n");
}

#[tokio::test]
async fn dir_sets_working_directory() {
    let q = TestQueue::new();
    let work = tempfile::tempdir().unwrap();
    std::fs::write(work.path().join("marker.txt"), "").unwrap();
    let json = serde_json::json!([{ "cmd": "ls", "dir": work.path() }]).to_string();
    let pending = q.submit("cwd", &json);

    q.runner(ErrorPolicy::Break, SetupFailure::Archive).handle(&pending).await.unwrap();

    let unpacked = q.unpack("cwd");
    assert_eq!(read(&unpacked.path().join("cwd").join("1").join("out")), "marker.txt\n");
}

#[tokio::test]
async fn log_growth_is_captured() {
    let q = TestQueue::new();
    let work = tempfile::tempdir().unwrap();
    let log = work.path().join("service.log");
    std::fs::write(&log, "before\n").unwrap();
    let cmd = format!("sh -c 'echo during >> {}'", log.display());
    let json = serde_json::json!([{ "cmd": cmd, "log": log }]).to_string();
    let pending = q.submit("logged", &json);

    q.runner(ErrorPolicy::Break, SetupFailure::Archive).handle(&pending).await.unwrap();

    let unpacked = q.unpack("logged");
    assert_eq!(read(&unpacked.path().join("logged").join("1").join("log")), "during\n");
}

#[tokio::test]
async fn unknown_fields_survive_into_archive() {
    let q = TestQueue::new();
    let pending = q.submit("extra", r#"[{"cmd": "true", "owner": "ops"}]"#);

    q.runner(ErrorPolicy::Break, SetupFailure::Archive).handle(&pending).await.unwrap();

    let unpacked = q.unpack("extra");
    let doc = archived_doc(unpacked.path(), "extra");
    assert_eq!(doc.entries[0].extra.get("owner"), Some(&serde_json::json!("ops")));
}

#[tokio::test]
async fn numeric_job_names_are_archived() {
    for name in ["1", "2"] {
        archive_numeric(name).await;
    }
}

async fn archive_numeric(name: &str) {
    let q = TestQueue::new();
    let pending = q.submit(name, r#"[{"cmd": "sh -c 'echo one'"}, {"cmd": "true"}]"#);

    let outcome = q.runner(ErrorPolicy::Break, SetupFailure::Archive).handle(&pending).await.unwrap();

    let archive = q.dir(QueueState::Finished).join(format!("{name}.tar.gz"));
    assert_eq!(outcome, JobOutcome::Archived(archive));
    assert!(q.queue.list(QueueState::Running).unwrap().is_empty());

    let unpacked = q.unpack(name);
    assert_eq!(read(&unpacked.path().join(name).join("1").join("out")), "one\n");
    assert_eq!(archived_doc(unpacked.path(), name).entries.len(), 2);
}

#[tokio::test]
async fn stale_running_directory_is_replaced() {
    let q = TestQueue::new();
    let stale = q.dir(QueueState::Running).join("again");
    std::fs::create_dir_all(stale.join("9")).unwrap();
    std::fs::write(stale.join("9").join("out"), "left over").unwrap();
    let pending = q.submit("again", r#"[{"cmd": "true"}]"#);

    q.runner(ErrorPolicy::Break, SetupFailure::Archive).handle(&pending).await.unwrap();

    let unpacked = q.unpack("again");
    assert!(!unpacked.path().join("again").join("9").exists());
    assert!(!stale.exists());
}

#[tokio::test]
async fn archive_failure_is_recorded() {
    let q = TestQueue::new();
    let pending = q.submit("stuck", r#"[{"cmd": "sh -c 'echo ran'"}]"#);
    let runner = q
        .runner(ErrorPolicy::Break, SetupFailure::Archive)
        .with_archiver(crate::archive::Archiver::with_tar("/nonexistent/tar"));

    let outcome = runner.handle(&pending).await.unwrap();

    assert_eq!(outcome, JobOutcome::Errored(q.queue.error_record_path("stuck")));
    let record = q.record("stuck");
    assert_eq!(record.error.first().map(String::as_str), Some("archive failed"));
    assert_eq!(record.body["entries"][0]["cmd"], "sh -c 'echo ran'");
    assert!(!pending.exists());
    assert!(q.queue.list(QueueState::Finished).unwrap().is_empty());
    assert_eq!(read(&q.dir(QueueState::Error).join("stuck.d").join("1").join("out")), "ran\n");
}
