// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup.

use std::io::Write;
use std::sync::Arc;

use fs2::FileExt;
use jobq_core::DirectoryQueue;
use tracing::{info, warn};

use super::{Config, DaemonState, LifecycleError};

/// Prepare the home directory and take the PID lock.
pub fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    match startup_inner(config) {
        Ok(state) => Ok(state),
        Err(e) => {
            // A failed lock means the PID file belongs to a running daemon.
            if matches!(e, LifecycleError::Queue(_) | LifecycleError::Io(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

fn startup_inner(config: &Config) -> Result<DaemonState, LifecycleError> {
    // 1. Home directory
    if config.home.exists() && !config.home.is_dir() {
        return Err(LifecycleError::NotADirectory(config.home.clone()));
    }
    std::fs::create_dir_all(&config.home)?;

    // 2. Lock without truncating, so a running daemon's PID survives a failed attempt
    let mut lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    // 3. Queue directories
    let queue = Arc::new(DirectoryQueue::new(&config.home));
    queue.ensure_all()?;

    info!(
        home = %config.home.display(),
        on_error = %config.runner.on_error,
        setup_failure = %config.runner.setup_failure,
        "daemon started"
    );
    Ok(DaemonState { config: config.clone(), queue, lock_file })
}

fn cleanup_on_failure(config: &Config) {
    if config.lock_path.exists() {
        if let Err(e) = std::fs::remove_file(&config.lock_path) {
            warn!(error = %e, "failed to remove PID file after failed startup");
        }
    }
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
