// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;
use crate::runner::{ErrorPolicy, SetupFailure};

/// Root directory of the queue. Required.
pub fn home_dir() -> Result<PathBuf, LifecycleError> {
    std::env::var("JOBQ_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .ok_or(LifecycleError::NoHome)
}

/// Sleep after a pending listing is exhausted (default 10s).
pub fn poll_interval() -> Duration {
    millis("JOBQ_POLL_MS").unwrap_or(Duration::from_millis(10_000))
}

/// Sleep after each job (default 111ms).
pub fn job_gap() -> Duration {
    millis("JOBQ_JOB_GAP_MS").unwrap_or(Duration::from_millis(111))
}

/// `JOBQ_ON_ERROR`, falling back to the build-time default.
pub fn on_error() -> Result<ErrorPolicy, LifecycleError> {
    setting("JOBQ_ON_ERROR")
}

/// `JOBQ_SETUP_FAILURE`, default `archive`.
pub fn setup_failure() -> Result<SetupFailure, LifecycleError> {
    setting("JOBQ_SETUP_FAILURE")
}

fn millis(var: &str) -> Option<Duration> {
    std::env::var(var).ok().and_then(|s| s.trim().parse::<u64>().ok()).map(Duration::from_millis)
}

fn setting<T>(var: &'static str) -> Result<T, LifecycleError>
where
    T: Default + std::str::FromStr<Err = crate::runner::ParseSettingError>,
{
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => {
            value.parse().map_err(|source| LifecycleError::InvalidSetting { var, source })
        }
        _ => Ok(T::default()),
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
