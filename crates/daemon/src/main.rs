// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jobqd`: the job queue daemon.

use std::process::ExitCode;

use jobq_daemon::{install_signal_handlers, logging, startup, Config, LifecycleError};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            let _guard = logging::init(None);
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    let _guard = logging::init(Some(&config.log_path));

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "jobqd failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config) -> Result<(), LifecycleError> {
    let daemon = startup(config)?;
    let worker = daemon.worker();
    let signals = install_signal_handlers(worker.shutdown_handle())?;

    info!(pid = std::process::id(), "jobqd ready");
    worker.run().await;

    signals.abort();
    daemon.shutdown();
    Ok(())
}
