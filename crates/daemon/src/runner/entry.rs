// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution of a single command entry.

use std::path::Path;

use jobq_core::CommandEntry;
use tracing::{debug, warn};

use super::{ErrorPolicy, JobRunner, SetupFailure};
use crate::exec::{self, CaptureSinks, CommandSpec};
use crate::log_diff::{LogDiffCopier, LOG_FILE};

/// How a failed entry affects the rest of its job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Failure {
    /// Annotate the entry and move on to the next one.
    Recoverable(String),
    /// Write an error record and end the job without an archive.
    FatalRecorded(String),
    /// Annotate the entry, skip the remaining entries, archive as usual.
    FatalUnrecorded(String),
}

impl JobRunner {
    /// Run entry number `index` (1-based) in `<job_dir>/<index>`.
    ///
    /// Empty `out`/`err` files are removed whatever the outcome.
    pub(super) async fn run_entry(
        &self,
        job_dir: &Path,
        index: usize,
        entry: &CommandEntry,
    ) -> Result<(), Failure> {
        let dir = job_dir.join(index.to_string());
        std::fs::create_dir_all(&dir).map_err(|e| {
            Failure::FatalRecorded(format!("Could not make job dir {}: {e}", dir.display()))
        })?;
        let sinks = CaptureSinks::open(&dir).map_err(|e| {
            Failure::FatalRecorded(format!(
                "Could not create output files in {}: {e}",
                dir.display()
            ))
        })?;

        let result = self.run_commands(&dir, entry, &sinks).await;

        if let Err(e) = sinks.finish() {
            warn!(dir = %dir.display(), error = %e, "could not clean up empty output files");
        }
        result
    }

    async fn run_commands(
        &self,
        dir: &Path,
        entry: &CommandEntry,
        sinks: &CaptureSinks,
    ) -> Result<(), Failure> {
        for pre in &entry.pre {
            if let Err(e) = exec::run(&CommandSpec::new(pre, dir), sinks).await {
                return Err(self.setup_failure(format!("pre command failed\n{e}")));
            }
        }

        let cwd = entry.dir.clone().unwrap_or_else(|| dir.to_path_buf());

        let copier = match &entry.log {
            None => None,
            Some(log) if !log.is_file() => {
                return Err(self.setup_failure(format!("File does not exist: {}", log.display())));
            }
            Some(log) => match LogDiffCopier::start(log, &dir.join(LOG_FILE)) {
                Ok(copier) => Some(copier),
                Err(e) => return Err(self.setup_failure(e.to_string())),
            },
        };

        let spec = CommandSpec::new(&entry.cmd, cwd).with_env(entry.env_pairs());
        let outcome = exec::run(&spec, sinks).await;

        let log_note = match copier.map(LogDiffCopier::finish) {
            Some(Ok(bytes)) => {
                debug!(bytes, "captured log growth");
                None
            }
            Some(Err(e)) => Some(e.to_string()),
            None => None,
        };

        match outcome {
            Ok(()) => match log_note {
                None => Ok(()),
                Some(note) => Err(Failure::Recoverable(note)),
            },
            Err(e) => {
                let mut message = e.to_string();
                if let Some(note) = log_note {
                    message.push('\n');
                    message.push_str(&note);
                }
                Err(match self.config.on_error {
                    ErrorPolicy::Break => Failure::FatalRecorded(message),
                    ErrorPolicy::Continue => Failure::Recoverable(message),
                })
            }
        }
    }

    fn setup_failure(&self, message: String) -> Failure {
        match self.config.setup_failure {
            SetupFailure::Archive => Failure::FatalUnrecorded(message),
            SetupFailure::Record => Failure::FatalRecorded(message),
        }
    }
}
