// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job documents and their command entries.
//!
//! A job file is a JSON array. Each element describes one step:
//!
//! ```json
//! [
//!   { "pre": ["mkdir -p build"],
//!     "cmd": "make -C build",
//!     "dir": "/src/project",
//!     "env": [ {"CC": "clang"} ],
//!     "log": "/var/log/build.log" }
//! ]
//! ```
//!
//! Fields the runner does not understand are carried through untouched so the
//! archived copy matches what the producer submitted, plus annotations.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading or writing a job document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read job file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON failed to parse job file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize job document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One step of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEntry {
    /// Setup commands run in order before `cmd`, in the entry directory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre: Vec<String>,
    /// The main command.
    pub cmd: String,
    /// Working directory for `cmd`; defaults to the entry directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Environment overrides, applied in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<IndexMap<String, String>>,
    /// External log file whose growth during `cmd` is captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<PathBuf>,
    /// Failure lines recorded while running this entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error: Vec<String>,
    /// Fields not interpreted by the runner.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CommandEntry {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self {
            pre: Vec::new(),
            cmd: cmd.into(),
            dir: None,
            env: Vec::new(),
            log: None,
            error: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Append each line of `message` to the entry's `error` array.
    pub fn annotate(&mut self, message: &str) {
        self.error.extend(message.lines().map(str::to_string));
    }

    pub fn has_errors(&self) -> bool {
        !self.error.is_empty()
    }

    /// Flatten the `env` list into ordered `(name, value)` pairs.
    ///
    /// Later maps override earlier ones when the same name appears twice.
    pub fn env_pairs(&self) -> Vec<(String, String)> {
        let mut merged: IndexMap<String, String> = IndexMap::new();
        for map in &self.env {
            for (name, value) in map {
                merged.insert(name.clone(), value.clone());
            }
        }
        merged.into_iter().collect()
    }
}

/// A parsed job file: the ordered list of entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobDocument {
    pub entries: Vec<CommandEntry>,
}

impl JobDocument {
    pub fn new(entries: Vec<CommandEntry>) -> Self {
        Self { entries }
    }

    /// Read and parse a job file.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let bytes = std::fs::read(path)
            .map_err(|source| DocumentError::Read { path: path.to_path_buf(), source })?;
        Self::from_slice(&bytes).map_err(|source| DocumentError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Pretty-printed JSON, as written back into the archive.
    pub fn to_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when any entry carries an `error` annotation.
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(CommandEntry::has_errors)
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
