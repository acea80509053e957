//! Shared test utilities for the doc-redirects test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = site_dir();
//! let report = emit(&redirects(&[("old/", "/new/")]), site.path()).unwrap();
//! assert!(read_output(site.path(), "old/index.html").contains("/new/"));
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::RedirectMap;
use crate::emit::EmitReport;

/// Empty temp directory standing in for a generated site's output root.
pub fn site_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Build a redirect map from `(source, target)` pairs.
pub fn redirects(pairs: &[(&str, &str)]) -> RedirectMap {
    pairs.iter().copied().collect()
}

/// Read a file under the output root. Panics with the path on failure.
pub fn read_output(root: &Path, relative: &str) -> String {
    let path = root.join(relative);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("could not read {}: {e}", path.display()))
}

/// Write a file under the output root, creating parent directories.
pub fn write_output(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Contents of every file a report says was written, in report order.
pub fn snapshot_outputs(root: &Path, report: &EmitReport) -> Vec<(PathBuf, Vec<u8>)> {
    report
        .entries
        .iter()
        .map(|e| {
            let path = e.page.output_path.clone();
            assert!(path.starts_with(root), "{} outside output root", path.display());
            let bytes = std::fs::read(&path).unwrap();
            (path, bytes)
        })
        .collect()
}
