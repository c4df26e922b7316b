// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::job::CommandEntry;

fn queue() -> (tempfile::TempDir, DirectoryQueue) {
    let home = tempfile::tempdir().unwrap();
    let queue = DirectoryQueue::new(home.path());
    (home, queue)
}

#[test]
fn new_touches_nothing() {
    let (home, _queue) = queue();
    assert!(!home.path().join("j").exists());
}

#[yare::parameterized(
    pending = { QueueState::Pending, "p" },
    running = { QueueState::Running, "r" },
    error = { QueueState::Error, "e" },
    finished = { QueueState::Finished, "f" },
)]
fn dirs_are_created_on_access(state: QueueState, leaf: &str) {
    let (home, queue) = queue();
    let path = queue.dir(state).unwrap();
    assert_eq!(path, home.path().join("j").join(leaf));
    assert!(path.is_dir());
}

#[test]
fn dirs_are_recreated_when_removed() {
    let (_home, queue) = queue();
    let pending = queue.pending().unwrap();
    std::fs::remove_dir(&pending).unwrap();
    assert!(queue.pending().unwrap().is_dir());
}

#[test]
fn uncreatable_dir_fails_loudly() {
    let (home, _) = queue();
    // A regular file where the root should be
    let bogus = home.path().join("not-a-dir");
    std::fs::write(&bogus, "x").unwrap();
    let queue = DirectoryQueue::new(&bogus);

    let err = queue.pending().unwrap_err();
    assert!(matches!(err, QueueError::CreateDir { .. }), "got {err:?}");
}

#[test]
fn list_pending_skips_markers_and_directories() {
    let (_home, queue) = queue();
    let pending = queue.pending().unwrap();
    std::fs::write(pending.join("job-a"), "[]").unwrap();
    std::fs::write(pending.join(".in-progress"), "[]").unwrap();
    std::fs::create_dir(pending.join("subdir")).unwrap();

    let found: Vec<PathBuf> = queue.list_pending().unwrap().collect();
    assert_eq!(found, vec![pending.join("job-a")]);
}

#[test]
fn list_pending_sees_new_files_on_each_call() {
    let (_home, queue) = queue();
    assert_eq!(queue.list_pending().unwrap().count(), 0);

    queue.submit("job-1", b"[]").unwrap();
    assert_eq!(queue.list_pending().unwrap().count(), 1);

    queue.submit("job-2", b"[]").unwrap();
    assert_eq!(queue.list_pending().unwrap().count(), 2);
}

#[test]
fn submit_leaves_no_marker_behind() {
    let (_home, queue) = queue();
    let path = queue.submit("build", br#"[{"cmd": "true"}]"#).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"[{"cmd": "true"}]"#);
    let names: Vec<_> = std::fs::read_dir(queue.pending().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["build"]);
}

#[test]
fn submit_refuses_to_replace_a_pending_job() {
    let (_home, queue) = queue();
    let path = queue.submit("nightly", br#"[{"cmd": "true"}]"#).unwrap();

    let err = queue.submit("nightly", br#"[{"cmd": "false"}]"#).unwrap_err();
    assert!(matches!(err, QueueError::AlreadyPending(ref n) if n == "nightly"), "got {err:?}");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"[{"cmd": "true"}]"#);
    assert!(!queue.pending().unwrap().join(".nightly").exists());
}

#[yare::parameterized(
    empty = { "" },
    marker = { ".hidden" },
    nested = { "a/b" },
    backslash = { "a\\b" },
)]
fn submit_rejects_bad_names(name: &str) {
    let (_home, queue) = queue();
    assert!(matches!(queue.submit(name, b"[]"), Err(QueueError::InvalidName(_))));
}

#[test]
fn error_record_lands_in_error_dir() {
    let (_home, queue) = queue();
    let mut entry = CommandEntry::new("false");
    entry.annotate("exit 1");
    let record = ErrorRecord::for_entry(&entry).unwrap();

    let path = queue.write_error_record("job", &record).unwrap();
    assert_eq!(path, queue.error_record_path("job"));
    let parsed = ErrorRecord::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(parsed.error, vec!["exit 1"]);
}

#[test]
fn quarantine_moves_file_out_of_pending() {
    let (_home, queue) = queue();
    let path = queue.submit("poison", b"[]").unwrap();

    let target = queue.quarantine(&path).unwrap();
    assert!(!path.exists());
    assert_eq!(target, queue.error().unwrap().join("poison.rejected"));
    assert_eq!(queue.list_pending().unwrap().count(), 0);
}

#[test]
fn counts_ignore_markers() {
    let (_home, queue) = queue();
    queue.submit("a", b"[]").unwrap();
    queue.submit("b", b"[]").unwrap();
    std::fs::write(queue.finished().unwrap().join(".a.tar.gz"), b"partial").unwrap();
    std::fs::write(queue.finished().unwrap().join("c.tar.gz"), b"done").unwrap();

    let counts = queue.counts().unwrap();
    assert_eq!(
        counts,
        vec![
            (QueueState::Pending, 2),
            (QueueState::Running, 0),
            (QueueState::Error, 0),
            (QueueState::Finished, 1),
        ]
    );
}

#[test]
fn error_listing_skips_kept_job_trees() {
    let (_home, queue) = queue();
    let error = queue.error().unwrap();
    std::fs::write(error.join("broken"), "{}").unwrap();
    std::fs::create_dir_all(error.join("broken.d").join("1")).unwrap();

    assert_eq!(queue.list(QueueState::Error).unwrap(), vec!["broken"]);
    assert!(queue.counts().unwrap().contains(&(QueueState::Error, 1)));
}

#[test]
fn state_display_names() {
    assert_eq!(QueueState::Pending.to_string(), "pending");
    assert_eq!(QueueState::Finished.to_string(), "finished");
    assert!(is_marker(".x"));
    assert!(!is_marker("x."));
    assert_eq!(marker_name("job"), ".job");
}
