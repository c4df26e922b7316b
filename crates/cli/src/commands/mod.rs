// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod list;
pub mod show_error;
pub mod status;
pub mod submit;

use clap::ValueEnum;
use jobq_core::QueueState;

/// Queue state as accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StateArg {
    Pending,
    Running,
    Error,
    Finished,
}

impl From<StateArg> for QueueState {
    fn from(arg: StateArg) -> Self {
        match arg {
            StateArg::Pending => QueueState::Pending,
            StateArg::Running => QueueState::Running,
            StateArg::Error => QueueState::Error,
            StateArg::Finished => QueueState::Finished,
        }
    }
}
