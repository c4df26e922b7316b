// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Submit command handler

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use jobq_core::{DirectoryQueue, JobDocument, QueueError};

use crate::exit_error::ExitError;

#[derive(Args)]
pub struct SubmitArgs {
    /// Job file to submit, or `-` to read it from stdin
    pub file: PathBuf,
    /// Job name (defaults to the file name)
    #[arg(long)]
    pub name: Option<String>,
}

pub fn handle(queue: &DirectoryQueue, args: SubmitArgs) -> Result<()> {
    let from_stdin = args.file.as_os_str() == "-";
    let bytes = if from_stdin {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf).context("reading job from stdin")?;
        buf
    } else {
        std::fs::read(&args.file).with_context(|| format!("reading {}", args.file.display()))?
    };

    let name = match args.name {
        Some(name) => name,
        None if from_stdin => {
            return Err(ExitError::user("--name is required when reading from stdin").into())
        }
        None => args
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ExitError::user(format!("{} has no file name", args.file.display())))?,
    };

    let doc = JobDocument::from_slice(&bytes)
        .map_err(|e| ExitError::user(format!("not a valid job document: {e}")))?;
    if doc.is_empty() {
        return Err(ExitError::user("job has no entries").into());
    }

    match queue.submit(&name, &bytes) {
        Ok(_) => {}
        Err(QueueError::InvalidName(name)) => {
            return Err(ExitError::user(format!("invalid job name {name:?}")).into())
        }
        Err(e @ QueueError::AlreadyPending(_)) => return Err(ExitError::user(e.to_string()).into()),
        Err(e) => return Err(e.into()),
    }
    println!("{name}");
    Ok(())
}
