// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn captures_stdout_and_stderr_separately() {
    let dir = tempfile::tempdir().unwrap();
    let sinks = CaptureSinks::open(dir.path()).unwrap();

    run(&CommandSpec::new("sh -c 'echo out; echo err >&2'", dir.path()), &sinks).await.unwrap();

    assert_eq!(read(sinks.out_path()), "out\n");
    assert_eq!(read(sinks.err_path()), "err\n");
}

#[tokio::test]
async fn sinks_exist_even_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let sinks = CaptureSinks::open(dir.path()).unwrap();

    run(&CommandSpec::new("true", dir.path()), &sinks).await.unwrap();

    assert!(dir.path().join(OUT_FILE).exists());
    assert!(dir.path().join(ERR_FILE).exists());
}

#[tokio::test]
async fn successive_commands_append() {
    let dir = tempfile::tempdir().unwrap();
    let sinks = CaptureSinks::open(dir.path()).unwrap();

    run(&CommandSpec::new("echo one", dir.path()), &sinks).await.unwrap();
    run(&CommandSpec::new("echo two", dir.path()), &sinks).await.unwrap();

    assert_eq!(read(sinks.out_path()), "one\ntwo\n");
}

#[tokio::test]
async fn non_zero_exit_reports_code() {
    let dir = tempfile::tempdir().unwrap();
    let sinks = CaptureSinks::open(dir.path()).unwrap();

    let err = run(&CommandSpec::new("sh -c 'exit 3'", dir.path()), &sinks).await.unwrap_err();

    match &err {
        ExecError::NonZeroExit { code, message } => {
            assert_eq!(*code, 3);
            assert!(message.contains("exited with code 3"), "{message}");
        }
        other => panic!("expected NonZeroExit, got {other:?}"),
    }
    assert_eq!(err.exit_code(), Some(3));
}

#[tokio::test]
async fn killed_by_signal_is_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let sinks = CaptureSinks::open(dir.path()).unwrap();

    let err = run(&CommandSpec::new("sh -c 'kill -9 $$'", dir.path()), &sinks).await.unwrap_err();

    match err {
        ExecError::NonZeroExit { code, message } => {
            assert_eq!(code, -1);
            assert!(message.contains("signal 9"), "{message}");
        }
        other => panic!("expected NonZeroExit, got {other:?}"),
    }
}

#[yare::parameterized(
    missing_program = { "definitely-not-a-real-program-jobq" },
    empty_line = { "   " },
    unbalanced_quote = { "echo 'oops" },
)]
fn spawn_failures(line: &str) {
    tokio::runtime::Runtime::new().unwrap().block_on(async {
        let dir = tempfile::tempdir().unwrap();
        let sinks = CaptureSinks::open(dir.path()).unwrap();
        let err = run(&CommandSpec::new(line, dir.path()), &sinks).await.unwrap_err();
        assert!(matches!(err, ExecError::SpawnFailure { .. }), "got {err:?}");
        assert_eq!(err.exit_code(), None);
    });
}

#[tokio::test]
async fn missing_working_directory_is_spawn_failure() {
    let dir = tempfile::tempdir().unwrap();
    let sinks = CaptureSinks::open(dir.path()).unwrap();
    let gone = dir.path().join("gone");

    let err = run(&CommandSpec::new("true", &gone), &sinks).await.unwrap_err();

    match err {
        ExecError::SpawnFailure { message } => assert!(message.contains("gone"), "{message}"),
        other => panic!("expected SpawnFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn runs_in_given_directory_with_env() {
    let dir = tempfile::tempdir().unwrap();
    let work = dir.path().join("work");
    std::fs::create_dir(&work).unwrap();
    let sinks = CaptureSinks::open(dir.path()).unwrap();

    let spec = CommandSpec::new("sh -c 'pwd; echo $GREETING'", &work)
        .with_env(vec![("GREETING".to_string(), "hello".to_string())]);
    run(&spec, &sinks).await.unwrap();

    let out = read(sinks.out_path());
    let mut lines = out.lines();
    let pwd = std::fs::canonicalize(lines.next().unwrap()).unwrap();
    assert_eq!(pwd, std::fs::canonicalize(&work).unwrap());
    assert_eq!(lines.next(), Some("hello"));
}

#[tokio::test]
async fn finish_removes_only_empty_sinks() {
    let dir = tempfile::tempdir().unwrap();
    let sinks = CaptureSinks::open(dir.path()).unwrap();

    run(&CommandSpec::new("echo kept", dir.path()), &sinks).await.unwrap();
    sinks.finish().unwrap();

    assert!(dir.path().join(OUT_FILE).exists());
    assert!(!dir.path().join(ERR_FILE).exists());
}

#[test]
fn remove_if_empty_ignores_missing_and_non_empty() {
    let dir = tempfile::tempdir().unwrap();
    remove_if_empty(&dir.path().join("absent")).unwrap();

    let full = dir.path().join("full");
    std::fs::write(&full, "x").unwrap();
    remove_if_empty(&full).unwrap();
    assert!(full.exists());

    let empty = dir.path().join("empty");
    std::fs::write(&empty, "").unwrap();
    remove_if_empty(&empty).unwrap();
    assert!(!empty.exists());
}
