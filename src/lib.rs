//! # doc-redirects
//!
//! Static redirect pages for documentation sites. When pages move, the old
//! URLs keep working: each old path gets a tiny HTML page whose
//! `meta http-equiv="refresh"` sends the browser to the new location.
//!
//! There is no server involved. Output is plain files that work on any static
//! host, written into the site's output directory after everything else has
//! been generated.
//!
//! # Pipeline
//!
//! ```text
//! config.toml [redirects]  →  validate  →  RedirectMap
//! end of rendering (output dir)  →  resolve  →  render  →  write
//! ```
//!
//! Validation happens when the config is read, so a malformed redirect map
//! stops the run before anything is written. Emission happens once, at the
//! end, so redirects may deliberately replace generated pages (with a
//! warning).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Config file loading, the `redirects` validator, [`config::RedirectMap`] |
//! | [`resolve`] | Output file paths and target references (verbatim or relative) |
//! | [`page`] | HTML escaping and the redirect page template |
//! | [`emit`] | Writes every redirect; per-entry failure isolation; dry-run planning |
//! | [`host`] | Option registry and end-of-rendering hook a generator exposes |
//! | [`plugin`] | Declares the redirect options on a host and subscribes emission |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Relative Targets
//!
//! Targets that are not absolute (`/…`, `http://…`, `https://…`) are resolved
//! against the output directory and written relative to each redirect page.
//! The site keeps working when served from a sub-path or opened from disk.
//!
//! ## Escape Everything, Once
//!
//! Targets come from user config and land in three HTML contexts: text, a
//! double-quoted attribute, and the single-quoted URL inside the refresh
//! tag. One escaping pass covering `& < > ' "` is safe in all three.
//!
//! ## Entries Are Independent
//!
//! One unwritable entry does not cost the others. Emission writes everything
//! it can and then reports every failure together.

pub mod config;
pub mod emit;
pub mod host;
pub mod output;
pub mod page;
pub mod plugin;
pub mod resolve;

#[cfg(test)]
pub(crate) mod test_helpers;
