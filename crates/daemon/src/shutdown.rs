// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Graceful shutdown on signals.
//!
//! SIGSEGV is not handled: the runtime cannot safely intercept it.

use std::sync::Arc;

use nix::sys::signal::Signal;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Stops a worker between jobs.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    job_lock: Arc<Mutex<()>>,
    cancel: CancellationToken,
}

impl ShutdownHandle {
    pub fn new(job_lock: Arc<Mutex<()>>, cancel: CancellationToken) -> Self {
        Self { job_lock, cancel }
    }

    /// Wait for any in-flight job to finish, then cancel the worker.
    pub async fn shutdown(&self) {
        info!("shutting down");
        let _guard = self.job_lock.lock().await;
        self.cancel.cancel();
        info!("shut down");
    }

    pub fn is_shutdown(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once shutdown has completed.
    pub async fn wait(&self) {
        self.cancel.cancelled().await;
    }
}

/// Run `handle.shutdown()` on the first SIGINT, SIGTERM, SIGHUP or SIGABRT.
pub fn install_signal_handlers(handle: ShutdownHandle) -> std::io::Result<JoinHandle<()>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigabrt = signal(SignalKind::from_raw(Signal::SIGABRT as i32))?;

    Ok(tokio::spawn(async move {
        let received = tokio::select! {
            _ = sigint.recv() => Signal::SIGINT,
            _ = sigterm.recv() => Signal::SIGTERM,
            _ = sighup.recv() => Signal::SIGHUP,
            _ = sigabrt.recv() => Signal::SIGABRT,
        };
        info!(signal = %received, "received signal");
        handle.shutdown().await;
    }))
}

#[cfg(test)]
#[path = "shutdown_tests.rs"]
mod tests;
