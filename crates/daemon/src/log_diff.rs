// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capture of bytes appended to an external log file while a command runs.
//!
//! The source length is recorded when the copier starts. On finish, exactly
//! the bytes between that offset and the then-current length are appended to
//! the capture file. Content present before the command is never copied.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Capture file name inside an entry directory.
pub const LOG_FILE: &str = "log";

/// Copy granularity.
const CHUNK: usize = 1024;

#[derive(Debug, Error)]
pub enum LogDiffError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("log file {path} shrank from {before} to {after} bytes while the command ran")]
    Shrunk { path: PathBuf, before: u64, after: u64 },
}

/// In-flight diff copy from `source` into `dest`.
#[derive(Debug)]
pub struct LogDiffCopier {
    source: PathBuf,
    dest: PathBuf,
    start: u64,
    out: File,
}

impl LogDiffCopier {
    /// Record the current length of `source` and create `dest`.
    pub fn start(source: &Path, dest: &Path) -> Result<Self, LogDiffError> {
        let start = file_len(source)?;
        let out = File::create(dest).map_err(|e| io_err(dest, e))?;
        Ok(Self { source: source.to_path_buf(), dest: dest.to_path_buf(), start, out })
    }

    /// Source length when the copier started.
    pub fn start_offset(&self) -> u64 {
        self.start
    }

    /// Append the new bytes to the capture file.
    ///
    /// Returns the number of bytes copied. The capture file is removed when
    /// nothing was copied or when the source shrank.
    pub fn finish(self) -> Result<u64, LogDiffError> {
        let Self { source, dest, start, out } = self;

        let end = match file_len(&source) {
            Ok(end) => end,
            Err(e) => {
                drop(out);
                let _ = std::fs::remove_file(&dest);
                return Err(e);
            }
        };
        if end < start {
            drop(out);
            let _ = std::fs::remove_file(&dest);
            return Err(LogDiffError::Shrunk { path: source, before: start, after: end });
        }

        let copied = match copy_range(&source, start, end - start, out) {
            Ok(copied) => copied,
            Err(e) => {
                let _ = std::fs::remove_file(&dest);
                return Err(io_err(&source, e));
            }
        };

        let kept = std::fs::metadata(&dest).map(|m| m.len()).unwrap_or(0);
        if copied == 0 || kept == 0 {
            std::fs::remove_file(&dest).map_err(|e| io_err(&dest, e))?;
        }
        Ok(copied)
    }
}

/// Copy `len` bytes starting at `offset` of `source` into `out`, one chunk
/// at a time.
fn copy_range(source: &Path, offset: u64, len: u64, out: File) -> std::io::Result<u64> {
    let mut input = File::open(source)?;
    input.seek(SeekFrom::Start(offset))?;
    let mut input = BufReader::with_capacity(CHUNK, input).take(len);
    let mut out = BufWriter::with_capacity(CHUNK, out);

    let mut buf = [0u8; CHUNK];
    let mut copied = 0u64;
    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n])?;
        copied += n as u64;
    }
    out.flush()?;
    Ok(copied)
}

fn file_len(path: &Path) -> Result<u64, LogDiffError> {
    std::fs::metadata(path).map(|m| m.len()).map_err(|e| io_err(path, e))
}

fn io_err(path: &Path, source: std::io::Error) -> LogDiffError {
    LogDiffError::Io { path: path.to_path_buf(), source }
}

#[cfg(test)]
#[path = "log_diff_tests.rs"]
mod tests;
