// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use jobq_core::QueueState;

#[test]
fn creates_home_and_queue_directories() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_home(dir.path().join("home"));

    let state = startup(&config).unwrap();

    for state_dir in QueueState::ALL {
        assert!(state.queue.path(state_dir).is_dir(), "{state_dir} missing");
    }
    let pid = std::fs::read_to_string(&config.lock_path).unwrap();
    assert_eq!(pid.trim(), std::process::id().to_string());

    state.shutdown();
    assert!(!config.lock_path.exists());
}

#[test]
fn home_must_be_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let home = dir.path().join("file");
    std::fs::write(&home, "").unwrap();

    let err = startup(&Config::for_home(&home)).err().unwrap();
    assert!(matches!(err, LifecycleError::NotADirectory(_)), "got {err:?}");
}

#[test]
fn second_daemon_cannot_take_the_lock() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_home(dir.path());
    let first = startup(&config).unwrap();

    let err = startup(&config).err().unwrap();
    assert!(matches!(err, LifecycleError::LockFailed(_)), "got {err:?}");

    // The running daemon's PID file is left alone.
    let pid = std::fs::read_to_string(&config.lock_path).unwrap();
    assert_eq!(pid.trim(), std::process::id().to_string());
    first.shutdown();
}

#[test]
fn lock_is_released_after_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_home(dir.path());

    startup(&config).unwrap().shutdown();
    startup(&config).unwrap().shutdown();
}
