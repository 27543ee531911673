//! Common helpers for hierarchy integration tests.

use std::path::PathBuf;

use tempfile::TempDir;

/// Write `content` to `name` inside a fresh temp dir.
///
/// The `TempDir` must be kept alive for as long as the file is used.
pub fn create_test_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    (dir, path)
}
