// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: configuration, startup, shutdown.

mod startup;
pub use startup::startup;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use jobq_core::{DirectoryQueue, QueueError};
use thiserror::Error;
use tracing::{info, warn};

use crate::env;
use crate::runner::{JobRunner, ParseSettingError, RunnerConfig};
use crate::worker::{Worker, WorkerTiming};

/// Name of the PID/lock file inside the home directory.
pub const PID_FILE: &str = "jobqd.pid";
/// Name of the daemon log file inside the home directory.
pub const LOG_FILE: &str = "jobqd.log";

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Queue root (`JOBQ_HOME`)
    pub home: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    pub runner: RunnerConfig,
    pub timing: WorkerTiming,
}

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self, LifecycleError> {
        let mut config = Self::for_home(env::home_dir()?);
        config.runner =
            RunnerConfig { on_error: env::on_error()?, setup_failure: env::setup_failure()? };
        config.timing =
            WorkerTiming { poll_interval: env::poll_interval(), job_gap: env::job_gap() };
        Ok(config)
    }

    /// Default settings for `home`.
    pub fn for_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            lock_path: home.join(PID_FILE),
            log_path: home.join(LOG_FILE),
            home,
            runner: RunnerConfig::default(),
            timing: WorkerTiming::default(),
        }
    }
}

/// Daemon state during operation.
pub struct DaemonState {
    pub config: Config,
    pub queue: Arc<DirectoryQueue>,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
}

impl DaemonState {
    /// Build the worker serving this daemon's queue.
    pub fn worker(&self) -> Worker {
        let runner = JobRunner::new(Arc::clone(&self.queue), self.config.runner);
        Worker::new(runner, Arc::clone(&self.queue), self.config.timing)
    }

    /// Remove the PID file. The lock is released when `self` drops.
    pub fn shutdown(self) {
        if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
            warn!(error = %e, "failed to remove PID file");
        }
        info!("daemon shutdown complete");
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("JOBQ_HOME is not set")]
    NoHome,

    #[error("JOBQ_HOME {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("invalid {var}: {source}")]
    InvalidSetting {
        var: &'static str,
        #[source]
        source: ParseSettingError,
    },

    #[error("failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
