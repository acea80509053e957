//! Path resolution for redirect entries.
//!
//! Two questions are answered for every `(source, target)` pair:
//!
//! 1. **Where does the redirect page go?** The source path is joined onto the
//!    output directory. Directory-like sources (trailing `/`) get an
//!    `index.html` so the old directory URL keeps working.
//! 2. **What URL does the page point at?** Targets starting with `/`,
//!    `http://` or `https://` are already correct and pass through untouched.
//!    Anything else names a path under the output directory and is rewritten
//!    relative to the directory holding the redirect page, so the link works
//!    at any nesting depth and on any host prefix.
//!
//! All resolution is lexical: nothing here touches the filesystem, and
//! targets are never checked for existence.
//!
//! ```text
//! output_dir = /site
//! "old.html"  → "new.html"   ⇒ /site/old.html        → new.html
//! "old/"      → "/new/"      ⇒ /site/old/index.html  → /new/
//! "a/b.html"  → "c.html"     ⇒ /site/a/b.html        → ../c.html
//! ```

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// File written for directory-like source paths.
pub const INDEX_FILE: &str = "index.html";

/// Target prefixes that are embedded as-is.
const VERBATIM_PREFIXES: [&str; 3] = ["/", "http://", "https://"];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResolveError {
    #[error("source path {0:?} does not name a file inside the output directory")]
    InvalidSource(String),
}

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component.
///
/// `..` at the filesystem root stays at the root. Leading `..` on a relative
/// path is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(Component::ParentDir.as_os_str()),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Whether a source path names a directory rather than a file.
pub fn is_directory_source(source: &str) -> bool {
    source.chars().next_back().is_some_and(std::path::is_separator)
}

/// Compute the file a redirect for `source` is written to.
///
/// A leading separator on `source` is ignored: source paths are always
/// relative to `output_dir`. Fails when the result would not be a file
/// strictly inside `output_dir` (empty source, or one that climbs out with
/// `..`).
pub fn output_file_path(output_dir: &Path, source: &str) -> Result<PathBuf, ResolveError> {
    let root = normalize(output_dir);
    let relative = source.trim_start_matches(std::path::is_separator);
    let mut path = normalize(&root.join(relative));
    if is_directory_source(source) {
        path.push(INDEX_FILE);
    }
    if path == root || !path.starts_with(&root) {
        return Err(ResolveError::InvalidSource(source.to_string()));
    }
    Ok(path)
}

/// Whether `target` is absolute (root-relative path or full URL).
pub fn is_verbatim_target(target: &str) -> bool {
    VERBATIM_PREFIXES
        .iter()
        .any(|prefix| target.starts_with(*prefix))
}

/// Compute the unescaped reference a redirect page at `output_file` embeds
/// for `target`.
///
/// Non-verbatim targets are resolved against `output_dir`, then expressed
/// relative to the directory containing `output_file`, with `/` separators.
pub fn target_reference(output_dir: &Path, output_file: &Path, target: &str) -> String {
    if is_verbatim_target(target) {
        return target.to_string();
    }
    let resolved = normalize(&output_dir.join(target));
    let base = output_file.parent().map(normalize).unwrap_or_default();
    let relative = pathdiff::diff_paths(&resolved, &base).unwrap_or(resolved);
    url_path(&relative)
}

/// Render a relative path with `/` separators regardless of platform.
fn url_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
