// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command execution with file-backed output capture.
//!
//! Commands are split with [`jobq_core::split_args`] and spawned directly,
//! without a shell. Stdout and stderr are handed to the child as file
//! descriptors, so output goes straight to disk as it is produced.

use std::fs::{File, OpenOptions};
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use thiserror::Error;
use tracing::debug;

/// Stdout capture file name inside an entry directory.
pub const OUT_FILE: &str = "out";
/// Stderr capture file name inside an entry directory.
pub const ERR_FILE: &str = "err";

/// Why a command did not succeed.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The process ran and exited unsuccessfully.
    #[error("{message}")]
    NonZeroExit { code: i32, message: String },

    /// The process could not be started at all.
    #[error("{message}")]
    SpawnFailure { message: String },
}

impl ExecError {
    /// Exit code for `NonZeroExit`, `-1` when killed by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecError::NonZeroExit { code, .. } => Some(*code),
            ExecError::SpawnFailure { .. } => None,
        }
    }
}

/// One command to run.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// The unsplit command line from the job file.
    pub line: String,
    pub cwd: PathBuf,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(line: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self { line: line.into(), cwd: cwd.into(), env: Vec::new() }
    }

    pub fn with_env(mut self, env: Vec<(String, String)>) -> Self {
        self.env = env;
        self
    }
}

/// The `out` and `err` files of one entry directory.
///
/// Opened in append mode so every command of an entry adds to the same pair.
#[derive(Debug)]
pub struct CaptureSinks {
    out_path: PathBuf,
    err_path: PathBuf,
    out: File,
    err: File,
}

impl CaptureSinks {
    /// Create (or reopen) `out` and `err` under `dir`.
    pub fn open(dir: &Path) -> std::io::Result<Self> {
        let out_path = dir.join(OUT_FILE);
        let err_path = dir.join(ERR_FILE);
        let out = OpenOptions::new().create(true).append(true).open(&out_path)?;
        let err = OpenOptions::new().create(true).append(true).open(&err_path)?;
        Ok(Self { out_path, err_path, out, err })
    }

    pub fn out_path(&self) -> &Path {
        &self.out_path
    }

    pub fn err_path(&self) -> &Path {
        &self.err_path
    }

    fn stdio(&self) -> std::io::Result<(Stdio, Stdio)> {
        Ok((Stdio::from(self.out.try_clone()?), Stdio::from(self.err.try_clone()?)))
    }

    /// Close both files and delete whichever ended up empty.
    pub fn finish(self) -> std::io::Result<()> {
        let Self { out_path, err_path, out, err } = self;
        drop(out);
        drop(err);
        remove_if_empty(&out_path)?;
        remove_if_empty(&err_path)?;
        Ok(())
    }
}

/// Delete `path` when it exists with zero length.
pub fn remove_if_empty(path: &Path) -> std::io::Result<()> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() == 0 => std::fs::remove_file(path),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Run `spec` to completion with its output going to `sinks`.
pub async fn run(spec: &CommandSpec, sinks: &CaptureSinks) -> Result<(), ExecError> {
    let argv = jobq_core::split_args(&spec.line).map_err(|e| ExecError::SpawnFailure {
        message: format!("invalid command line `{}`: {e}", spec.line),
    })?;
    let Some((program, args)) = argv.split_first() else {
        return Err(ExecError::SpawnFailure { message: "empty command line".to_string() });
    };

    let (stdout, stderr) = sinks.stdio().map_err(|e| ExecError::SpawnFailure {
        message: format!("could not attach output capture for `{}`: {e}", spec.line),
    })?;

    debug!(command = %spec.line, cwd = %spec.cwd.display(), "starting command");

    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args)
        .current_dir(&spec.cwd)
        .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::null())
        .stdout(stdout)
        .stderr(stderr);

    let status = cmd.status().await.map_err(|e| ExecError::SpawnFailure {
        message: format!("failed to start `{}` in {}: {e}", spec.line, spec.cwd.display()),
    })?;

    if status.success() {
        return Ok(());
    }
    match (status.code(), status.signal()) {
        (Some(code), _) => Err(ExecError::NonZeroExit {
            code,
            message: format!("command `{}` exited with code {code}", spec.line),
        }),
        (None, Some(signal)) => Err(ExecError::NonZeroExit {
            code: -1,
            message: format!("command `{}` was terminated by signal {signal}", spec.line),
        }),
        (None, None) => Err(ExecError::NonZeroExit {
            code: -1,
            message: format!("command `{}` exited abnormally", spec.line),
        }),
    }
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
