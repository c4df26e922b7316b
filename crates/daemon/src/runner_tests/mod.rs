// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner tests

mod archive;
mod failures;
mod settings;
mod setup;

use super::*;
use jobq_core::{ErrorRecord, JobDocument, QueueState};
use tempfile::TempDir;

/// A queue rooted in a temp dir plus helpers to inspect it.
struct TestQueue {
    _root: TempDir,
    queue: Arc<DirectoryQueue>,
}

impl TestQueue {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let queue = Arc::new(DirectoryQueue::new(root.path()));
        queue.ensure_all().unwrap();
        Self { _root: root, queue }
    }

    fn runner(&self, on_error: ErrorPolicy, setup_failure: SetupFailure) -> JobRunner {
        JobRunner::new(Arc::clone(&self.queue), RunnerConfig { on_error, setup_failure })
    }

    fn submit(&self, name: &str, json: &str) -> PathBuf {
        self.queue.submit(name, json.as_bytes()).unwrap()
    }

    fn dir(&self, state: QueueState) -> PathBuf {
        self.queue.path(state)
    }

    fn record(&self, name: &str) -> ErrorRecord {
        ErrorRecord::from_slice(&std::fs::read(self.queue.error_record_path(name)).unwrap())
            .unwrap()
    }

    /// Unpack `finished/<name>.tar.gz` and return the extraction root.
    fn unpack(&self, name: &str) -> TempDir {
        let out = tempfile::tempdir().unwrap();
        let archive = self.dir(QueueState::Finished).join(format!("{name}.tar.gz"));
        let status = std::process::Command::new("tar")
            .arg("-xzf")
            .arg(&archive)
            .arg("-C")
            .arg(out.path())
            .status()
            .unwrap();
        assert!(status.success(), "could not unpack {}", archive.display());
        out
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

fn archived_doc(unpacked: &Path, name: &str) -> JobDocument {
    JobDocument::load(&unpacked.join(name).join(document_name(name))).unwrap()
}
