// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! jobq daemon library
//!
//! Runs job files dropped into `$JOBQ_HOME/j/p` one at a time, capturing
//! output per entry and delivering each job as an archive or error record.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod archive;
pub mod env;
pub mod exec;
pub mod lifecycle;
pub mod log_diff;
pub mod logging;
pub mod runner;
pub mod shutdown;
pub mod worker;

pub use archive::{ArchiveError, Archiver};
pub use exec::{CaptureSinks, CommandSpec, ExecError};
pub use lifecycle::{startup, Config, DaemonState, LifecycleError};
pub use log_diff::{LogDiffCopier, LogDiffError};
pub use runner::{ErrorPolicy, JobError, JobOutcome, JobRunner, RunnerConfig, SetupFailure};
pub use shutdown::{install_signal_handlers, ShutdownHandle};
pub use worker::{Worker, WorkerTiming};
