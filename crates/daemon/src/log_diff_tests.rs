// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use std::fs::OpenOptions;

fn append(path: &Path, bytes: &[u8]) {
    let mut f = OpenOptions::new().append(true).open(path).unwrap();
    f.write_all(bytes).unwrap();
}

#[test]
fn copies_only_appended_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("external.log");
    let dest = dir.path().join(LOG_FILE);
    std::fs::write(&source, "old line\n").unwrap();

    let copier = LogDiffCopier::start(&source, &dest).unwrap();
    assert_eq!(copier.start_offset(), 9);
    append(&source, b"new line\n");

    assert_eq!(copier.finish().unwrap(), 9);
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "new line\n");
}

#[test]
fn nothing_appended_leaves_no_capture() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("external.log");
    let dest = dir.path().join(LOG_FILE);
    std::fs::write(&source, "existing").unwrap();

    let copier = LogDiffCopier::start(&source, &dest).unwrap();
    assert!(dest.exists());

    assert_eq!(copier.finish().unwrap(), 0);
    assert!(!dest.exists());
}

#[test]
fn spans_many_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("external.log");
    let dest = dir.path().join(LOG_FILE);
    std::fs::write(&source, vec![b'x'; 100]).unwrap();

    let copier = LogDiffCopier::start(&source, &dest).unwrap();
    let appended: Vec<u8> = (0..(CHUNK * 3 + 17)).map(|i| (i % 251) as u8).collect();
    append(&source, &appended);

    assert_eq!(copier.finish().unwrap(), appended.len() as u64);
    assert_eq!(std::fs::read(&dest).unwrap(), appended);
}

#[test]
fn shrunk_source_fails_loudly() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("external.log");
    let dest = dir.path().join(LOG_FILE);
    std::fs::write(&source, "a long line that will be rotated away\n").unwrap();

    let copier = LogDiffCopier::start(&source, &dest).unwrap();
    std::fs::write(&source, "short\n").unwrap();

    match copier.finish().unwrap_err() {
        LogDiffError::Shrunk { before, after, .. } => {
            assert_eq!(before, 38);
            assert_eq!(after, 6);
        }
        other => panic!("expected Shrunk, got {other:?}"),
    }
    assert!(!dest.exists());
}

#[test]
fn missing_source_at_start_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = LogDiffCopier::start(&dir.path().join("absent"), &dir.path().join(LOG_FILE))
        .unwrap_err();
    assert!(matches!(err, LogDiffError::Io { .. }));
    assert!(!dir.path().join(LOG_FILE).exists());
}

proptest! {
    #[test]
    fn capture_equals_appended_suffix(
        initial in proptest::collection::vec(any::<u8>(), 0..4096),
        appended in proptest::collection::vec(any::<u8>(), 0..4096),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("external.log");
        let dest = dir.path().join(LOG_FILE);
        std::fs::write(&source, &initial).unwrap();

        let copier = LogDiffCopier::start(&source, &dest).unwrap();
        append(&source, &appended);
        let copied = copier.finish().unwrap();

        prop_assert_eq!(copied, appended.len() as u64);
        if appended.is_empty() {
            prop_assert!(!dest.exists());
        } else {
            prop_assert_eq!(std::fs::read(&dest).unwrap(), appended);
        }
    }
}
