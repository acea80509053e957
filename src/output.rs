//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every redirect leads with its positional index and the configured
//! `source → target` pair, which is what users wrote and recognize. The file
//! that was (or would be) written is shown as indented context, relative to
//! the output directory.
//!
//! # Output Format
//!
//! ## Emit
//!
//! ```text
//! Redirects
//! 001 old.html → new.html
//!     Output: old.html
//! 002 old/ → /new/
//!     Output: old/index.html (overwritten)
//!
//! Wrote 2 redirects (1 overwritten)
//! ```
//!
//! ## List
//!
//! ```text
//! Redirects
//! 001 a/b.html → c.html
//!     Output: a/b.html
//!     Reference: ../c.html
//!
//! 1 redirect
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::config::RedirectMap;
use crate::emit::{EmitReport, Outcome, RedirectPage};
use crate::host::Options;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// `001 old.html → new.html`
fn redirect_header(index: usize, source: &str, target: &str) -> String {
    format!("{} {} \u{2192} {}", format_index(index), source, target)
}

/// Display `path` relative to `output_dir` with `/` separators.
///
/// Paths outside `output_dir` are shown in full.
fn display_output(path: &Path, output_dir: &Path) -> String {
    match path.strip_prefix(output_dir) {
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.display().to_string(),
    }
}

/// `1 redirect`, `2 redirects`
fn count_redirects(n: usize) -> String {
    if n == 1 {
        "1 redirect".to_string()
    } else {
        format!("{} redirects", n)
    }
}

// ============================================================================
// emit
// ============================================================================

/// Format the result of writing redirects.
pub fn format_emit_output(report: &EmitReport, output_dir: &Path) -> Vec<String> {
    let mut lines = vec!["Redirects".to_string()];
    for (i, emitted) in report.entries.iter().enumerate() {
        let page = &emitted.page;
        lines.push(redirect_header(i + 1, &page.source, &page.target));
        let marker = match emitted.outcome {
            Outcome::Written => "",
            Outcome::Overwritten => " (overwritten)",
        };
        lines.push(format!(
            "    Output: {}{}",
            display_output(&page.output_path, output_dir),
            marker
        ));
    }

    lines.push(String::new());
    let overwritten = report.overwritten();
    if overwritten > 0 {
        lines.push(format!(
            "Wrote {} ({} overwritten)",
            count_redirects(report.len()),
            overwritten
        ));
    } else {
        lines.push(format!("Wrote {}", count_redirects(report.len())));
    }
    lines
}

/// Print emit output to stdout.
pub fn print_emit_output(report: &EmitReport, output_dir: &Path) {
    for line in format_emit_output(report, output_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// list
// ============================================================================

/// Format a dry run: where each redirect would be written and what it links to.
pub fn format_plan_output(pages: &[RedirectPage], output_dir: &Path) -> Vec<String> {
    let mut lines = vec!["Redirects".to_string()];
    for (i, page) in pages.iter().enumerate() {
        lines.push(redirect_header(i + 1, &page.source, &page.target));
        lines.push(format!(
            "    Output: {}",
            display_output(&page.output_path, output_dir)
        ));
        if page.reference != page.target {
            lines.push(format!("    Reference: {}", page.reference));
        }
    }
    lines.push(String::new());
    lines.push(count_redirects(pages.len()));
    lines
}

/// Print dry-run output to stdout.
pub fn print_plan_output(pages: &[RedirectPage], output_dir: &Path) {
    for line in format_plan_output(pages, output_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Format the result of validating a config.
pub fn format_check_output(redirects: &RedirectMap) -> Vec<String> {
    let mut lines = vec!["Redirects".to_string()];
    for (i, (source, target)) in redirects.iter().enumerate() {
        lines.push(redirect_header(i + 1, source, target));
    }
    lines.push(String::new());
    lines.push(format!("Config is valid: {}", count_redirects(redirects.len())));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(redirects: &RedirectMap) {
    for line in format_check_output(redirects) {
        println!("{}", line);
    }
}

// ============================================================================
// options
// ============================================================================

/// Format the declared options with their help text.
pub fn format_options_output(options: &Options) -> Vec<String> {
    let mut lines = vec!["Options".to_string()];
    for declaration in options.declarations() {
        if declaration.config_file_only {
            lines.push(format!("    {} (config file only)", declaration.name));
        } else {
            lines.push(format!("    {}", declaration.name));
        }
        lines.push(format!("        {}", declaration.help));
    }
    lines
}

/// Print declared options to stdout.
pub fn print_options_output(options: &Options) {
    for line in format_options_output(options) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
