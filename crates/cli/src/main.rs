// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jobq`: submit and inspect jobs in a jobq home directory.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod exit_error;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use jobq_core::DirectoryQueue;

use commands::{list, show_error, status, submit};

#[derive(Parser)]
#[command(
    name = "jobq",
    version = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")),
    about = "Submit and inspect jobs for the jobqd daemon"
)]
struct Cli {
    /// Queue home directory
    #[arg(long, env = "JOBQ_HOME", global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Drop a job file into the pending directory
    Submit(submit::SubmitArgs),
    /// List job names by state
    List(list::ListArgs),
    /// Show queue counts and whether a daemon is running
    Status(status::StatusArgs),
    /// Print the error lines recorded for a failed job
    ShowError(show_error::ShowErrorArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let (code, message) = exit_error::exit_status(&e);
            if !message.is_empty() {
                eprintln!("error: {message}");
            }
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let home = cli
        .home
        .filter(|h| !h.as_os_str().is_empty())
        .ok_or_else(|| exit_error::ExitError::user("JOBQ_HOME is not set (or pass --home)"))?;
    let queue = DirectoryQueue::new(home);

    match cli.command {
        Command::Submit(args) => submit::handle(&queue, args),
        Command::List(args) => list::handle(&queue, args),
        Command::Status(args) => status::handle(&queue, args),
        Command::ShowError(args) => show_error::handle(&queue, args),
    }
}
