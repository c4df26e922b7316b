// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error records written to the error directory when a job fails.

use crate::job::{CommandEntry, JobDocument};
use serde::{Deserialize, Serialize};

/// A failed job's record: whatever JSON identifies the failure site plus the
/// failure lines.
///
/// - entry failures carry the offending entry's fields
/// - parse failures carry only `error`
/// - archival failures carry the whole document under `entries`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    #[serde(flatten)]
    pub body: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub error: Vec<String>,
}

impl ErrorRecord {
    /// Record for a job file that could not be parsed.
    pub fn parse_failure(message: &str) -> Self {
        Self { body: serde_json::Map::new(), error: lines(message) }
    }

    /// Record for a failing entry. The entry's accumulated `error` lines
    /// become the record's lines.
    pub fn for_entry(entry: &CommandEntry) -> Result<Self, serde_json::Error> {
        let mut body = match serde_json::to_value(entry)? {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        body.remove("error");
        Ok(Self { body, error: entry.error.clone() })
    }

    /// Record for a job whose entries ran but which could not be delivered.
    pub fn for_document(doc: &JobDocument, message: &str) -> Result<Self, serde_json::Error> {
        let mut body = serde_json::Map::new();
        body.insert("entries".to_string(), serde_json::to_value(doc)?);
        Ok(Self { body, error: lines(message) })
    }

    pub fn to_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

fn lines(message: &str) -> Vec<String> {
    message.lines().map(str::to_string).collect()
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
