// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The four-directory job queue.
//!
//! ```text
//! $JOBQ_HOME/j/p   pending: producers drop job files here
//! $JOBQ_HOME/j/r   running: per-job working trees
//! $JOBQ_HOME/j/e   error:   error records
//! $JOBQ_HOME/j/f   finished: <job>.tar.gz archives
//! ```
//!
//! Directories are created whenever they are found missing at access time.
//! Names starting with [`MARKER`] are invisible to discovery; writers use that
//! prefix for in-progress files and rename into place when done.

use crate::record::ErrorRecord;
use serde::{Deserialize, Serialize};
use std::fs::{self, ReadDir};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reserved first character of hidden and in-progress files.
pub const MARKER: char = '.';

/// Errors from queue directory operations.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("could not create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid job name {0:?}: must be non-empty, not start with '.', and contain no path separators")]
    InvalidName(String),

    #[error("a job named {0:?} is already pending")]
    AlreadyPending(String),

    #[error("failed to serialize error record: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl QueueError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }
}

/// Lifecycle state of a job, one directory each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueState {
    Pending,
    Running,
    Error,
    Finished,
}

crate::simple_display! {
    QueueState {
        Pending => "pending",
        Running => "running",
        Error => "error",
        Finished => "finished",
    }
}

impl QueueState {
    pub const ALL: [QueueState; 4] =
        [QueueState::Pending, QueueState::Running, QueueState::Error, QueueState::Finished];

    /// Directory name under `<home>/j`.
    pub fn dir_name(self) -> &'static str {
        match self {
            QueueState::Pending => "p",
            QueueState::Running => "r",
            QueueState::Error => "e",
            QueueState::Finished => "f",
        }
    }
}

/// True when `name` is reserved and must never be treated as a job.
pub fn is_marker(name: &str) -> bool {
    name.starts_with(MARKER)
}

/// The hidden sibling name used while `name` is being written.
pub fn marker_name(name: &str) -> String {
    format!("{MARKER}{name}")
}

/// Handle on the queue directories under a home directory.
#[derive(Debug, Clone)]
pub struct DirectoryQueue {
    home: PathBuf,
}

impl DirectoryQueue {
    /// No filesystem access happens until a directory is requested.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Path of a state directory without creating it.
    pub fn path(&self, state: QueueState) -> PathBuf {
        self.home.join("j").join(state.dir_name())
    }

    /// Path of a state directory, created if absent.
    pub fn dir(&self, state: QueueState) -> Result<PathBuf, QueueError> {
        let path = self.path(state);
        if !path.is_dir() {
            fs::create_dir_all(&path)
                .map_err(|source| QueueError::CreateDir { path: path.clone(), source })?;
        }
        Ok(path)
    }

    pub fn pending(&self) -> Result<PathBuf, QueueError> {
        self.dir(QueueState::Pending)
    }

    pub fn running(&self) -> Result<PathBuf, QueueError> {
        self.dir(QueueState::Running)
    }

    pub fn error(&self) -> Result<PathBuf, QueueError> {
        self.dir(QueueState::Error)
    }

    pub fn finished(&self) -> Result<PathBuf, QueueError> {
        self.dir(QueueState::Finished)
    }

    /// Create all four directories.
    pub fn ensure_all(&self) -> Result<(), QueueError> {
        for state in QueueState::ALL {
            self.dir(state)?;
        }
        Ok(())
    }

    /// Job files currently waiting in the pending directory.
    ///
    /// The iterator reads the directory lazily; call again to observe new
    /// arrivals. Marker files and subdirectories are skipped.
    pub fn list_pending(&self) -> Result<PendingFiles, QueueError> {
        let dir = self.pending()?;
        let inner = fs::read_dir(&dir).map_err(|e| QueueError::io(&dir, e))?;
        Ok(PendingFiles { inner })
    }

    /// Visible names in a state directory, sorted.
    ///
    /// In the error directory only files are listed: the `<job>.d` trees kept
    /// next to a record are not jobs of their own.
    pub fn list(&self, state: QueueState) -> Result<Vec<String>, QueueError> {
        let dir = self.dir(state)?;
        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| QueueError::io(&dir, e))? {
            let entry = entry.map_err(|e| QueueError::io(&dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_marker(&name) {
                continue;
            }
            if state == QueueState::Error && entry.path().is_dir() {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    /// Number of visible entries in each state directory.
    pub fn counts(&self) -> Result<Vec<(QueueState, usize)>, QueueError> {
        let mut counts = Vec::with_capacity(QueueState::ALL.len());
        for state in QueueState::ALL {
            counts.push((state, self.list(state)?.len()));
        }
        Ok(counts)
    }

    /// Drop a job file into pending without exposing a partial write.
    ///
    /// Never replaces a pending job of the same name.
    pub fn submit(&self, name: &str, contents: &[u8]) -> Result<PathBuf, QueueError> {
        validate_name(name)?;
        let dir = self.pending()?;
        let tmp = dir.join(marker_name(name));
        let target = dir.join(name);
        fs::write(&tmp, contents).map_err(|e| QueueError::io(&tmp, e))?;
        // link(2) fails instead of replacing, unlike rename(2)
        let linked = fs::hard_link(&tmp, &target);
        let _ = fs::remove_file(&tmp);
        match linked {
            Ok(()) => Ok(target),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(QueueError::AlreadyPending(name.to_string()))
            }
            Err(e) => Err(QueueError::io(&target, e)),
        }
    }

    /// Persist an error record as `error/<name>`.
    pub fn write_error_record(
        &self,
        name: &str,
        record: &ErrorRecord,
    ) -> Result<PathBuf, QueueError> {
        validate_name(name)?;
        let body = record.to_pretty()?;
        write_atomic(&self.error()?, name, body.as_bytes())
    }

    /// Path an error record for `name` is written to.
    pub fn error_record_path(&self, name: &str) -> PathBuf {
        self.path(QueueState::Error).join(name)
    }

    /// Move a pending file into the error directory as `<name>.rejected` so it
    /// is never polled again.
    pub fn quarantine(&self, path: &Path) -> Result<PathBuf, QueueError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| QueueError::InvalidName(path.display().to_string()))?;
        let target = self.error()?.join(format!("{name}.rejected"));
        fs::rename(path, &target).map_err(|e| QueueError::io(path, e))?;
        Ok(target)
    }
}

/// Lazy listing of pending job files. See [`DirectoryQueue::list_pending`].
#[derive(Debug)]
pub struct PendingFiles {
    inner: ReadDir,
}

impl Iterator for PendingFiles {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        for entry in self.inner.by_ref() {
            let Ok(entry) = entry else { continue };
            if is_marker(&entry.file_name().to_string_lossy()) {
                continue;
            }
            let path = entry.path();
            if path.is_file() {
                return Some(path);
            }
        }
        None
    }
}

fn validate_name(name: &str) -> Result<(), QueueError> {
    if name.is_empty() || is_marker(name) || name.contains(['/', '\\']) {
        return Err(QueueError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Write `contents` to `<dir>/.<name>` and rename it to `<dir>/<name>`.
pub fn write_atomic(dir: &Path, name: &str, contents: &[u8]) -> Result<PathBuf, QueueError> {
    let tmp = dir.join(marker_name(name));
    let target = dir.join(name);
    fs::write(&tmp, contents).map_err(|e| QueueError::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, &target) {
        let _ = fs::remove_file(&tmp);
        return Err(QueueError::io(&target, e));
    }
    Ok(target)
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
