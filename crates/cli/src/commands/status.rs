// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status command handler

use std::fs::File;
use std::path::Path;

use anyhow::Result;
use clap::Args;
use fs2::FileExt;
use jobq_core::{DirectoryQueue, QueueState};
use jobq_daemon::lifecycle::PID_FILE;

#[derive(Args)]
pub struct StatusArgs {
    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

/// Whether a daemon holds the PID lock of a home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonStatus {
    Running { pid: Option<u32> },
    NotRunning,
}

pub fn handle(queue: &DirectoryQueue, args: StatusArgs) -> Result<()> {
    let daemon = daemon_status(&queue.home().join(PID_FILE));
    let mut counts = Vec::with_capacity(QueueState::ALL.len());
    for state in QueueState::ALL {
        let count = if queue.path(state).is_dir() { queue.list(state)?.len() } else { 0 };
        counts.push((state, count));
    }

    if args.json {
        let mut map = serde_json::Map::new();
        for (state, count) in &counts {
            map.insert(state.to_string(), serde_json::json!(count));
        }
        let (running, pid) = match daemon {
            DaemonStatus::Running { pid } => (true, pid),
            DaemonStatus::NotRunning => (false, None),
        };
        let value = serde_json::json!({
            "daemon": { "running": running, "pid": pid },
            "counts": map,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match daemon {
        DaemonStatus::Running { pid: Some(pid) } => println!("Daemon: running (pid {pid})"),
        DaemonStatus::Running { pid: None } => println!("Daemon: running"),
        DaemonStatus::NotRunning => println!("Daemon: not running"),
    }
    for (state, count) in counts {
        println!("  {:<9} {count}", state.to_string());
    }
    Ok(())
}

/// Probe the PID lock without disturbing a running daemon.
pub fn daemon_status(lock_path: &Path) -> DaemonStatus {
    let Ok(file) = File::open(lock_path) else {
        return DaemonStatus::NotRunning;
    };
    if file.try_lock_shared().is_ok() {
        // Nobody holds the exclusive lock: the PID file is stale.
        let _ = FileExt::unlock(&file);
        return DaemonStatus::NotRunning;
    }
    let pid = std::fs::read_to_string(lock_path).ok().and_then(|s| s.trim().parse().ok());
    DaemonStatus::Running { pid }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
