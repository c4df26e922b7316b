// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Packaging of finished job directories.
//!
//! The archive is built under a marker name inside the finished directory and
//! renamed into place, so `<job>.tar.gz` only ever names a complete file.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use jobq_core::marker_name;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("job directory {0} has no usable name or parent")]
    BadSource(PathBuf),

    #[error("failed to start tar: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("tar exited with code {code}: {stderr}")]
    Tar { code: i32, stderr: String },

    #[error("failed to move archive into place at {path}: {source}")]
    Rename {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Final archive file name for a job.
pub fn archive_name(job: &str) -> String {
    format!("{job}.tar.gz")
}

/// Creates `<job>.tar.gz` archives in a finished directory.
#[derive(Debug, Clone)]
pub struct Archiver {
    tar: PathBuf,
}

impl Default for Archiver {
    fn default() -> Self {
        Self { tar: PathBuf::from("tar") }
    }
}

impl Archiver {
    /// Use a specific `tar` executable.
    pub fn with_tar(tar: impl Into<PathBuf>) -> Self {
        Self { tar: tar.into() }
    }

    /// Archive `job_dir` (its last component becomes the top-level entry)
    /// into `finished`. Returns the final archive path.
    pub async fn archive(&self, job_dir: &Path, finished: &Path) -> Result<PathBuf, ArchiveError> {
        let (Some(parent), Some(name)) = (job_dir.parent(), job_dir.file_name()) else {
            return Err(ArchiveError::BadSource(job_dir.to_path_buf()));
        };
        let name = name.to_string_lossy();
        let final_name = archive_name(&name);
        let tmp = finished.join(marker_name(&final_name));
        let target = finished.join(&final_name);

        debug!(job = %name, archive = %target.display(), "creating archive");

        let output = tokio::process::Command::new(&self.tar)
            .arg("-czf")
            .arg(&tmp)
            .arg("-C")
            .arg(parent)
            .arg(name.as_ref())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(ArchiveError::Spawn)?;

        if !output.status.success() {
            let _ = std::fs::remove_file(&tmp);
            return Err(ArchiveError::Tar {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if let Err(source) = std::fs::rename(&tmp, &target) {
            let _ = std::fs::remove_file(&tmp);
            return Err(ArchiveError::Rename { path: target, source });
        }
        Ok(target)
    }
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
