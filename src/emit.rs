//! Redirect emission.
//!
//! Runs once, after the rest of the site has been written, and turns every
//! redirect map entry into a static HTML page under the output directory.
//!
//! ## Per-Entry Steps
//!
//! ```text
//! (source, target)
//!   → output path      resolve::output_file_path   (old/ → old/index.html)
//!   → overwrite check  warn if something is already there
//!   → parent dirs      create_dir_all (idempotent, race-safe)
//!   → reference        resolve::target_reference   (verbatim or relative)
//!   → page             page::render_redirect_page  (escaped once)
//!   → write            replaces existing content
//! ```
//!
//! ## Failure Isolation
//!
//! Entries are independent. A bad source path or a filesystem error on one
//! entry is recorded and the remaining entries are still written; the caller
//! gets [`EmitError::Partial`] with both what was written and what failed.
//!
//! ## Shared Output Paths
//!
//! Two sources can name the same file (`a/` and `a/index.html`). Entries are
//! applied in source-path order, so the last one wins: only its page is
//! written, it is reported as [`Outcome::Overwritten`], and the usual
//! overwrite warning is logged once for every entry it replaces.
//!
//! ## Parallelism
//!
//! Pages are written on a dedicated rayon pool sized by
//! [`config::effective_threads`]. Output paths are distinct after the
//! shared-path pass above, and shared parent directories are created with
//! `create_dir_all`, which tolerates concurrent creation.
//!
//! Paths are compared lexically. On a case-insensitive filesystem `Old.html`
//! and `old.html` are one file, as are two paths through a symlinked
//! directory; such entries are not merged and whichever write lands last
//! wins. Use `[emit] max_processes = 1` to make that order follow source
//! order.

use crate::config::{self, EmitConfig, RedirectMap};
use crate::page;
use crate::resolve::{self, ResolveError};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix for log lines emitted while writing redirects.
pub const LOG_PREFIX: &str = "[doc-redirects]";

#[derive(Error, Debug)]
pub enum EntryError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("could not write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A redirect entry that could not be written.
#[derive(Debug)]
pub struct EntryFailure {
    pub source_path: String,
    pub error: EntryError,
}

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("{}", describe_partial(.written, .failures))]
    Partial {
        written: EmitReport,
        failures: Vec<EntryFailure>,
    },
    #[error("{} redirect(s) could not be resolved:{}", .0.len(), list_failures(.0))]
    Unresolved(Vec<EntryFailure>),
    #[error("could not start writer pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

fn describe_partial(written: &EmitReport, failures: &[EntryFailure]) -> String {
    format!(
        "{} of {} redirects could not be written:{}",
        failures.len(),
        failures.len() + written.len(),
        list_failures(failures)
    )
}

fn list_failures(failures: &[EntryFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("\n  {}: {}", f.source_path, f.error))
        .collect()
}

/// A fully resolved redirect page, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectPage {
    /// Source path as configured (e.g. `old/`).
    pub source: String,
    /// Target as configured (e.g. `new.html`).
    pub target: String,
    /// File the page is written to.
    pub output_path: PathBuf,
    /// Unescaped reference embedded in the page.
    pub reference: String,
    /// Rendered HTML.
    pub html: String,
}

impl RedirectPage {
    /// Resolve one redirect entry against `output_dir` without touching the
    /// filesystem.
    pub fn resolve(output_dir: &Path, source: &str, target: &str) -> Result<Self, EntryError> {
        let output_path = resolve::output_file_path(output_dir, source)?;
        let reference = resolve::target_reference(output_dir, &output_path, target);
        let html = page::render_redirect_page(&reference);
        Ok(Self {
            source: source.to_string(),
            target: target.to_string(),
            output_path,
            reference,
            html,
        })
    }

    /// Write the page, creating parent directories as needed.
    ///
    /// An existing file at the output path is replaced after a warning.
    pub fn write(&self) -> Result<Outcome, EntryError> {
        let existed = self.output_path.exists();
        if existed {
            warn!(
                "{LOG_PREFIX} {} will be overwritten with a redirect.",
                self.output_path.display()
            );
        }
        if let Some(parent) = self.output_path.parent() {
            fs::create_dir_all(parent).map_err(|source| EntryError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.output_path, &self.html).map_err(|source| EntryError::Io {
            path: self.output_path.clone(),
            source,
        })?;
        debug!(
            "{LOG_PREFIX} {} → {}",
            self.output_path.display(),
            self.reference
        );
        Ok(if existed {
            Outcome::Overwritten
        } else {
            Outcome::Written
        })
    }
}

/// What happened at a redirect's output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing was there before.
    Written,
    /// An existing file was replaced.
    Overwritten,
}

/// A redirect page that was written, with its outcome.
#[derive(Debug, Clone)]
pub struct Emitted {
    pub page: RedirectPage,
    pub outcome: Outcome,
}

/// Written redirects in source-path order.
#[derive(Debug, Clone, Default)]
pub struct EmitReport {
    pub entries: Vec<Emitted>,
}

impl EmitReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries that replaced an existing file.
    pub fn overwritten(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome == Outcome::Overwritten)
            .count()
    }
}

/// Resolve every entry without writing anything.
///
/// Returns the pages that would be written; an entry replaced by a later one
/// sharing its output path is left out. Fails with the full list of
/// unresolvable entries; nothing is partially returned in that case.
pub fn plan(redirects: &RedirectMap, output_dir: &Path) -> Result<Vec<RedirectPage>, EmitError> {
    let resolved = resolve_all(redirects, output_dir);
    if resolved.failures.is_empty() {
        Ok(resolved.pages)
    } else {
        Err(EmitError::Unresolved(resolved.failures))
    }
}

/// Write all redirects with default emission settings.
pub fn emit(redirects: &RedirectMap, output_dir: &Path) -> Result<EmitReport, EmitError> {
    emit_with(redirects, output_dir, &EmitConfig::default())
}

/// Write all redirects under `output_dir`.
pub fn emit_with(
    redirects: &RedirectMap,
    output_dir: &Path,
    config: &EmitConfig,
) -> Result<EmitReport, EmitError> {
    let Resolved {
        pages,
        replaced,
        mut failures,
    } = resolve_all(redirects, output_dir);

    let mut shared: HashSet<PathBuf> = HashSet::new();
    for page in &replaced {
        warn!(
            "{LOG_PREFIX} {} will be overwritten with a redirect.",
            page.output_path.display()
        );
        shared.insert(page.output_path.clone());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config::effective_threads(config))
        .build()?;
    let results: Vec<Result<Emitted, EntryFailure>> = pool.install(|| {
        pages
            .into_par_iter()
            .map(|page| match page.write() {
                Ok(_) if shared.contains(&page.output_path) => Ok(Emitted {
                    page,
                    outcome: Outcome::Overwritten,
                }),
                Ok(outcome) => Ok(Emitted { page, outcome }),
                Err(error) => Err(EntryFailure {
                    source_path: page.source,
                    error,
                }),
            })
            .collect()
    });

    let mut report = EmitReport::default();
    for result in results {
        match result {
            Ok(emitted) => report.entries.push(emitted),
            Err(failure) => failures.push(failure),
        }
    }

    info!(
        "{LOG_PREFIX} wrote {} redirect(s) to {}",
        report.len(),
        output_dir.display()
    );

    if failures.is_empty() {
        Ok(report)
    } else {
        failures.sort_by(|a, b| a.source_path.cmp(&b.source_path));
        Err(EmitError::Partial {
            written: report,
            failures,
        })
    }
}

/// Entries resolved against an output directory.
struct Resolved {
    /// One page per output path, in source-path order.
    pages: Vec<RedirectPage>,
    /// Pages dropped because a later source shares their output path.
    replaced: Vec<RedirectPage>,
    failures: Vec<EntryFailure>,
}

/// Resolve entries in source-path order. When two sources share an output
/// path the later one takes the earlier one's place.
fn resolve_all(redirects: &RedirectMap, output_dir: &Path) -> Resolved {
    let mut pages: Vec<RedirectPage> = Vec::with_capacity(redirects.len());
    let mut replaced = Vec::new();
    let mut failures = Vec::new();
    let mut claimed: HashMap<PathBuf, usize> = HashMap::new();

    for (source, target) in redirects.iter() {
        match RedirectPage::resolve(output_dir, source, target) {
            Ok(page) => match claimed.get(&page.output_path) {
                Some(&slot) => replaced.push(std::mem::replace(&mut pages[slot], page)),
                None => {
                    claimed.insert(page.output_path.clone(), pages.len());
                    pages.push(page);
                }
            },
            Err(error) => failures.push(EntryFailure {
                source_path: source.to_string(),
                error,
            }),
        }
    }

    pages.sort_by(|a, b| a.source.cmp(&b.source));
    Resolved {
        pages,
        replaced,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn writes_file_redirect() {
        let site = site_dir();
        let report = emit(&redirects(&[("old.html", "new.html")]), site.path()).unwrap();

        assert_eq!(report.len(), 1);
        let html = read_output(site.path(), "old.html");
        assert!(html.contains(r#"<meta http-equiv="refresh" content="0;URL='new.html'" />"#));
        assert!(html.contains(r#"<a href="new.html">new.html</a>"#));
    }

    #[test]
    fn writes_directory_redirect_to_index() {
        let site = site_dir();
        emit(&redirects(&[("old/", "/new/")]), site.path()).unwrap();

        let html = read_output(site.path(), "old/index.html");
        assert!(html.contains("content=\"0;URL='/new/'\""));
    }

    #[test]
    fn creates_missing_parent_directories() {
        let site = site_dir();
        emit(&redirects(&[("a/b/c/d.html", "e.html")]), site.path()).unwrap();

        let html = read_output(site.path(), "a/b/c/d.html");
        assert!(html.contains("URL='../../../e.html'"));
    }

    #[test]
    fn nested_source_gets_relative_target() {
        let site = site_dir();
        emit(&redirects(&[("a/b.html", "c.html")]), site.path()).unwrap();
        assert!(read_output(site.path(), "a/b.html").contains("URL='../c.html'"));
    }

    #[test]
    fn existing_file_is_overwritten() {
        let site = site_dir();
        write_output(site.path(), "old.html", "<p>original page</p>");

        let report = emit(&redirects(&[("old.html", "new.html")]), site.path()).unwrap();

        assert_eq!(report.entries[0].outcome, Outcome::Overwritten);
        assert_eq!(report.overwritten(), 1);
        let html = read_output(site.path(), "old.html");
        assert!(!html.contains("original page"));
        assert!(html.contains("new.html"));
    }

    #[test]
    fn second_run_is_byte_identical() {
        let site = site_dir();
        let map = redirects(&[
            ("old.html", "new.html"),
            ("old/", "/new/"),
            ("x/y.html", "https://example.com/?a=1&b='2'"),
        ]);

        let first = emit(&map, site.path()).unwrap();
        let snapshot = snapshot_outputs(site.path(), &first);
        let second = emit(&map, site.path()).unwrap();

        assert_eq!(snapshot, snapshot_outputs(site.path(), &second));
        assert!(second.entries.iter().all(|e| e.outcome == Outcome::Overwritten));
    }

    #[test]
    fn report_is_in_source_order() {
        let site = site_dir();
        let map = redirects(&[("c.html", "x"), ("a.html", "x"), ("b/", "x")]);
        let report = emit(&map, site.path()).unwrap();
        let sources: Vec<&str> = report.entries.iter().map(|e| e.page.source.as_str()).collect();
        assert_eq!(sources, vec!["a.html", "b/", "c.html"]);
    }

    #[test]
    fn invalid_source_does_not_block_other_entries() {
        let site = site_dir();
        let map = redirects(&[("../escape.html", "x.html"), ("ok.html", "x.html")]);

        let err = emit(&map, site.path()).unwrap_err();

        let EmitError::Partial { written, failures } = err else {
            panic!("expected partial failure");
        };
        assert_eq!(written.len(), 1);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].source_path, "../escape.html");
        assert!(matches!(failures[0].error, EntryError::Resolve(_)));
        assert!(site.path().join("ok.html").is_file());
    }

    #[test]
    fn io_failure_is_reported_per_entry() {
        let site = site_dir();
        // A file where a parent directory is needed
        write_output(site.path(), "blocker", "not a directory");
        let map = redirects(&[("blocker/page.html", "x.html"), ("fine.html", "x.html")]);

        let err = emit(&map, site.path()).unwrap_err();

        let EmitError::Partial { written, failures } = err else {
            panic!("expected partial failure");
        };
        assert_eq!(written.entries[0].page.source, "fine.html");
        assert_eq!(failures[0].source_path, "blocker/page.html");
        assert!(matches!(failures[0].error, EntryError::Io { .. }));
    }

    #[test]
    fn shared_output_path_keeps_last_entry() {
        let site = site_dir();
        let map = redirects(&[("a/", "first.html"), ("a/index.html", "second.html")]);

        let report = emit(&map, site.path()).unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report.entries[0].page.source, "a/index.html");
        assert_eq!(report.entries[0].outcome, Outcome::Overwritten);
        let html = read_output(site.path(), "a/index.html");
        assert!(html.contains("second.html"));
        assert!(!html.contains("first.html"));
    }

    #[test]
    fn shared_output_path_winner_follows_source_order() {
        let site = site_dir();
        let map = redirects(&[("./x.html", "one.html"), ("w.html", "w.html"), ("x.html", "two.html")]);

        let report = emit(&map, site.path()).unwrap();

        let sources: Vec<&str> = report.entries.iter().map(|e| e.page.source.as_str()).collect();
        assert_eq!(sources, vec!["w.html", "x.html"]);
        assert!(read_output(site.path(), "x.html").contains("two.html"));
    }

    #[test]
    fn plan_lists_only_the_surviving_page() {
        let site = site_dir();
        let map = redirects(&[("a/", "first.html"), ("a/index.html", "second.html")]);
        let pages = plan(&map, site.path()).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].target, "second.html");
    }

    #[test]
    fn partial_error_message_lists_failures() {
        let site = site_dir();
        let map = redirects(&[("", "x.html"), ("ok.html", "x.html")]);
        let message = emit(&map, site.path()).unwrap_err().to_string();
        assert!(message.starts_with("1 of 2 redirects could not be written:"));
        assert!(message.contains("does not name a file inside the output directory"));
    }

    #[test]
    fn plan_does_not_touch_filesystem() {
        let site = site_dir();
        let pages = plan(&redirects(&[("old/", "new.html")]), site.path()).unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].output_path, site.path().join("old").join("index.html"));
        assert_eq!(pages[0].reference, "../new.html");
        assert!(!site.path().join("old").exists());
    }

    #[test]
    fn plan_reports_all_invalid_entries() {
        let site = site_dir();
        let map = redirects(&[("", "x"), ("../y.html", "x"), ("fine.html", "x")]);
        let EmitError::Unresolved(failures) = plan(&map, site.path()).unwrap_err() else {
            panic!("expected unresolved entries");
        };
        assert_eq!(failures.len(), 2);
    }

    #[test]
    fn single_writer_produces_same_output() {
        let site = site_dir();
        let map = redirects(&[("a.html", "b.html"), ("c/", "d/e.html")]);
        let config = EmitConfig {
            max_processes: Some(1),
        };
        let report = emit_with(&map, site.path(), &config).unwrap();
        assert_eq!(report.len(), 2);
        assert!(read_output(site.path(), "c/index.html").contains("URL='../d/e.html'"));
    }

    #[test]
    fn empty_map_writes_nothing() {
        let site = site_dir();
        let report = emit(&RedirectMap::default(), site.path()).unwrap();
        assert!(report.is_empty());
        assert_eq!(std::fs::read_dir(site.path()).unwrap().count(), 0);
    }
}
