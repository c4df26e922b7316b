// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Show-error command handler

use anyhow::{Context, Result};
use clap::Args;
use jobq_core::{DirectoryQueue, ErrorRecord};

use crate::exit_error::ExitError;

#[derive(Args)]
pub struct ShowErrorArgs {
    /// Job name
    pub name: String,
    /// Print the whole error record as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn handle(queue: &DirectoryQueue, args: ShowErrorArgs) -> Result<()> {
    let path = queue.error_record_path(&args.name);
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ExitError::user(format!("no error record for {}", args.name)).into())
        }
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };
    let record = ErrorRecord::from_slice(&bytes)
        .with_context(|| format!("{} is not an error record", path.display()))?;

    if args.json {
        println!("{}", record.to_pretty()?);
    } else {
        for line in &record.error {
            println!("{line}");
        }
    }
    Ok(())
}
