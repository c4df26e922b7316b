// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

fn handle() -> (Arc<Mutex<()>>, ShutdownHandle) {
    let lock = Arc::new(Mutex::new(()));
    let handle = ShutdownHandle::new(Arc::clone(&lock), CancellationToken::new());
    (lock, handle)
}

#[tokio::test]
async fn shutdown_cancels() {
    let (_lock, handle) = handle();
    assert!(!handle.is_shutdown());

    handle.shutdown().await;

    assert!(handle.is_shutdown());
    tokio::time::timeout(Duration::from_secs(1), handle.wait()).await.unwrap();
}

#[tokio::test]
async fn shutdown_waits_for_job_lock() {
    let (lock, handle) = handle();
    let guard = lock.lock().await;

    let task = tokio::spawn({
        let handle = handle.clone();
        async move { handle.shutdown().await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!handle.is_shutdown(), "cancelled while a job held the lock");

    drop(guard);
    task.await.unwrap();
    assert!(handle.is_shutdown());
}

#[tokio::test]
#[serial_test::serial]
async fn hangup_triggers_shutdown() {
    let (_lock, handle) = handle();
    let task = install_signal_handlers(handle.clone()).unwrap();

    nix::sys::signal::raise(Signal::SIGHUP).unwrap();

    tokio::time::timeout(Duration::from_secs(5), task).await.unwrap().unwrap();
    assert!(handle.is_shutdown());
}
