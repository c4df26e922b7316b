// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The polling loop that feeds pending job files to the runner.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use jobq_core::DirectoryQueue;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::runner::JobRunner;
use crate::shutdown::ShutdownHandle;

/// Sleeps between jobs and between polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerTiming {
    /// After a listing is exhausted.
    pub poll_interval: Duration,
    /// After each job.
    pub job_gap: Duration,
}

impl Default for WorkerTiming {
    fn default() -> Self {
        Self { poll_interval: Duration::from_millis(10_000), job_gap: Duration::from_millis(111) }
    }
}

/// Single sequential worker over one queue.
pub struct Worker {
    runner: JobRunner,
    queue: Arc<DirectoryQueue>,
    timing: WorkerTiming,
    job_lock: Arc<Mutex<()>>,
    cancel: CancellationToken,
}

impl Worker {
    pub fn new(runner: JobRunner, queue: Arc<DirectoryQueue>, timing: WorkerTiming) -> Self {
        Self {
            runner,
            queue,
            timing,
            job_lock: Arc::new(Mutex::new(())),
            cancel: CancellationToken::new(),
        }
    }

    /// Handle that stops this worker once any in-flight job is done.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle::new(Arc::clone(&self.job_lock), self.cancel.clone())
    }

    /// Poll until cancelled.
    pub async fn run(&self) {
        info!(home = %self.queue.home().display(), "worker started");
        while !self.cancel.is_cancelled() {
            let handled = self.poll_once().await;
            debug!(handled, "pending listing exhausted");
            if !self.pause(self.timing.poll_interval).await {
                break;
            }
        }
        info!("worker stopped");
    }

    /// Work through one listing of the pending directory. Returns the number
    /// of job files handled.
    pub async fn poll_once(&self) -> usize {
        let pending = match self.queue.list_pending() {
            Ok(pending) => pending,
            Err(e) => {
                error!(error = %e, "could not list pending jobs");
                return 0;
            }
        };

        let mut handled = 0;
        for path in pending {
            {
                let _guard = self.job_lock.lock().await;
                if self.cancel.is_cancelled() {
                    break;
                }
                if !path.is_file() {
                    debug!(path = %path.display(), "job file vanished before it was handled");
                    continue;
                }
                self.handle(&path).await;
                handled += 1;
            }
            if !self.pause(self.timing.job_gap).await {
                break;
            }
        }
        handled
    }

    async fn handle(&self, path: &Path) {
        let Err(e) = self.runner.handle(path).await else {
            return;
        };
        error!(path = %path.display(), error = %error_chain(&e), "job could not be handled");
        match self.queue.quarantine(path) {
            Ok(target) => warn!(path = %path.display(), to = %target.display(), "job file quarantined"),
            Err(qe) => error!(path = %path.display(), error = %qe, "quarantine failed"),
        }
        if let Err(ae) = self.runner.abandon(path) {
            error!(path = %path.display(), error = %ae, "could not clear running directory");
        }
    }

    /// Sleep for `duration`. Returns false when woken by cancellation.
    async fn pause(&self, duration: Duration) -> bool {
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }
}

/// `e` followed by each of its sources, separated by `: `.
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut out = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !out.ends_with(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
