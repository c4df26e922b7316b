// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runs one job file from pending to finished (or error).
//!
//! ```text
//! Parsing ──parse error──────────────────────────────▶ Errored
//!    │
//!    ▼
//! PerEntry(1..N) ──FatalRecorded────────────────────▶ Errored
//!    │  └──FatalUnrecorded (stop early)──┐
//!    ▼                                   ▼
//! Finalizing ──archive error───────────────────────▶ Errored
//!    │
//!    ▼
//! Archived
//! ```
//!
//! Every path out of `handle` removes the pending file, so a job is never
//! picked up twice.

mod entry;

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use jobq_core::{
    DirectoryQueue, DocumentError, ErrorRecord, JobDocument, QueueError, QueueState,
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::archive::Archiver;

pub(crate) use entry::Failure;

/// What happens when a main command fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// End the job: record an error, skip the remaining entries.
    Break,
    /// Annotate the entry and run the next one.
    Continue,
}

jobq_core::simple_display! {
    ErrorPolicy {
        Break => "break",
        Continue => "continue",
    }
}

impl ErrorPolicy {
    /// The policy selected by the `continue-on-error` cargo feature.
    pub fn build_default() -> Self {
        if cfg!(feature = "continue-on-error") {
            ErrorPolicy::Continue
        } else {
            ErrorPolicy::Break
        }
    }
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self::build_default()
    }
}

impl FromStr for ErrorPolicy {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "break" => Ok(ErrorPolicy::Break),
            "continue" => Ok(ErrorPolicy::Continue),
            _ => Err(ParseSettingError { value: s.to_string(), expected: "break or continue" }),
        }
    }
}

/// How pre-command failures and missing log files end a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SetupFailure {
    /// Stop running entries, then archive the annotated document as usual.
    #[default]
    Archive,
    /// Treat like a recorded failure: error record, no archive.
    Record,
}

jobq_core::simple_display! {
    SetupFailure {
        Archive => "archive",
        Record => "record",
    }
}

impl FromStr for SetupFailure {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "archive" => Ok(SetupFailure::Archive),
            "record" => Ok(SetupFailure::Record),
            _ => Err(ParseSettingError { value: s.to_string(), expected: "archive or record" }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value {value:?}: expected {expected}")]
pub struct ParseSettingError {
    value: String,
    expected: &'static str,
}

/// Failure handling knobs for the runner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerConfig {
    pub on_error: ErrorPolicy,
    pub setup_failure: SetupFailure,
}

/// Where a handled job ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Path of `<job>.tar.gz` in the finished directory.
    Archived(PathBuf),
    /// Path of the error record in the error directory.
    Errored(PathBuf),
}

/// Failures the runner could not turn into an error record.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("job file {0} has no usable name")]
    BadName(PathBuf),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("failed to serialize error record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> JobError {
    let path = path.to_path_buf();
    move |source| JobError::Io { path, source }
}

/// Executes job files against a [`DirectoryQueue`].
#[derive(Debug, Clone)]
pub struct JobRunner {
    queue: Arc<DirectoryQueue>,
    config: RunnerConfig,
    archiver: Archiver,
}

impl JobRunner {
    pub fn new(queue: Arc<DirectoryQueue>, config: RunnerConfig) -> Self {
        Self { queue, config, archiver: Archiver::default() }
    }

    pub fn with_archiver(mut self, archiver: Archiver) -> Self {
        self.archiver = archiver;
        self
    }

    pub fn config(&self) -> RunnerConfig {
        self.config
    }

    /// Run the job file at `path` end to end.
    pub async fn handle(&self, path: &Path) -> Result<JobOutcome, JobError> {
        let name = job_name(path)?;
        info!(job = %name, "starting job");

        let mut doc = match JobDocument::load(path) {
            Ok(doc) => doc,
            Err(DocumentError::Parse { path: file, source }) => {
                let message = format!("JSON failed to parse job file {}\n{source}", file.display());
                error!(job = %name, error = %source, "job file is not a valid job document");
                return self.record(path, &name, &ErrorRecord::parse_failure(&message), None);
            }
            Err(e) => return Err(e.into()),
        };

        let job_dir = self.queue.running()?.join(&name);
        if job_dir.exists() {
            warn!(job = %name, dir = %job_dir.display(), "removing stale running directory");
            std::fs::remove_dir_all(&job_dir).map_err(io_err(&job_dir))?;
        }

        for (idx, entry) in doc.entries.iter_mut().enumerate() {
            let index = idx + 1;
            match self.run_entry(&job_dir, index, entry).await {
                Ok(()) => {}
                Err(Failure::Recoverable(message)) => {
                    warn!(job = %name, entry = index, error = %message, "entry failed, continuing");
                    entry.annotate(&message);
                }
                Err(Failure::FatalUnrecorded(message)) => {
                    warn!(job = %name, entry = index, error = %message, "entry failed, stopping job");
                    entry.annotate(&message);
                    break;
                }
                Err(Failure::FatalRecorded(message)) => {
                    error!(job = %name, entry = index, error = %message, "entry failed, recording error");
                    entry.annotate(&message);
                    let record = ErrorRecord::for_entry(entry)?;
                    return self.record(path, &name, &record, Some(&job_dir));
                }
            }
        }

        self.finalize(path, &name, &doc, &job_dir).await
    }

    /// Write the annotated document as `<job>.json` next to the entry
    /// directories, archive the job tree and clear it from pending and
    /// running.
    async fn finalize(
        &self,
        path: &Path,
        name: &str,
        doc: &JobDocument,
        job_dir: &Path,
    ) -> Result<JobOutcome, JobError> {
        std::fs::create_dir_all(job_dir).map_err(io_err(job_dir))?;
        let doc_path = job_dir.join(document_name(name));
        std::fs::write(&doc_path, doc.to_pretty()?).map_err(io_err(&doc_path))?;

        let finished = self.queue.finished()?;
        match self.archiver.archive(job_dir, &finished).await {
            Ok(archive) => {
                remove_pending(path)?;
                std::fs::remove_dir_all(job_dir).map_err(io_err(job_dir))?;
                info!(
                    job = %name,
                    archive = %archive.display(),
                    annotated = doc.has_errors(),
                    "job archived"
                );
                Ok(JobOutcome::Archived(archive))
            }
            Err(e) => {
                error!(job = %name, error = %e, "archiving failed, recording error");
                let record = ErrorRecord::for_document(doc, &format!("archive failed\n{e}"))?;
                self.record(path, name, &record, Some(job_dir))
            }
        }
    }

    /// Persist `record`, keep the job tree for inspection and drop the
    /// pending file.
    fn record(
        &self,
        path: &Path,
        name: &str,
        record: &ErrorRecord,
        job_dir: Option<&Path>,
    ) -> Result<JobOutcome, JobError> {
        let record_path = self.queue.write_error_record(name, record)?;
        if let Some(job_dir) = job_dir.filter(|d| d.exists()) {
            self.retain_job_dir(name, job_dir)?;
        }
        remove_pending(path)?;
        info!(job = %name, record = %record_path.display(), "job errored");
        Ok(JobOutcome::Errored(record_path))
    }

    /// Clear `running/<job>` after `handle` failed with a [`JobError`]. The
    /// tree is kept as `error/<job>.d` like any other failed job.
    pub fn abandon(&self, path: &Path) -> Result<(), JobError> {
        let name = job_name(path)?;
        let job_dir = self.queue.path(QueueState::Running).join(&name);
        if !job_dir.exists() {
            return Ok(());
        }
        warn!(job = %name, dir = %job_dir.display(), "abandoning running directory");
        self.retain_job_dir(&name, &job_dir)
    }

    /// Move a failed job's tree to `error/<job>.d`.
    fn retain_job_dir(&self, name: &str, job_dir: &Path) -> Result<(), JobError> {
        let target = self.queue.error()?.join(format!("{name}.d"));
        if target.exists() {
            std::fs::remove_dir_all(&target).map_err(io_err(&target))?;
        }
        if let Err(e) = std::fs::rename(job_dir, &target) {
            warn!(job = %name, error = %e, "could not keep job directory, removing it");
            std::fs::remove_dir_all(job_dir).map_err(io_err(job_dir))?;
        }
        Ok(())
    }
}

/// File name of a job, which names its running directory, archive and
/// error record.
pub fn job_name(path: &Path) -> Result<String, JobError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !jobq_core::is_marker(n))
        .map(str::to_string)
        .ok_or_else(|| JobError::BadName(path.to_path_buf()))
}

/// File name of the annotated document inside a job tree. The suffix keeps
/// it clear of the numbered entry directories.
pub fn document_name(job: &str) -> String {
    format!("{job}.json")
}

fn remove_pending(path: &Path) -> Result<(), JobError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_err(path)(e)),
    }
}

#[cfg(test)]
#[path = "../runner_tests/mod.rs"]
mod tests;
