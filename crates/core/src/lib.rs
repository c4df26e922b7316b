// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jobq-core: job documents and the directory queue shared by `jobqd` and `jobq`

pub mod macros;

pub mod args;
pub mod job;
pub mod queue;
pub mod record;

pub use args::{split as split_args, ArgsError};
pub use job::{CommandEntry, DocumentError, JobDocument};
pub use queue::{is_marker, marker_name, DirectoryQueue, PendingFiles, QueueError, QueueState};
pub use record::ErrorRecord;
