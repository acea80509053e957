//! Redirect configuration: loading, validation, and the typed redirect map.
//!
//! Configuration is read from a single file in the site root. TOML is the
//! default format; files ending in `.json` are parsed as JSON so a config
//! shared with other documentation tooling can be reused as-is.
//!
//! ## Config File
//!
//! ```toml
//! # Old path (relative to the output directory) → new target.
//! [redirects]
//! "old.html" = "new.html"          # relative to the output root
//! "guide/" = "/docs/guide/"        # directory → guide/index.html
//! "api.html" = "https://example.com/api/"
//!
//! [emit]
//! max_processes = 4                # parallel writers (omit for auto = CPU cores)
//! ```
//!
//! ## Validation
//!
//! `redirects` must be a table whose values are all strings. Anything else is
//! rejected with one fixed message, at load time, before any file is written.
//! Unknown top-level keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error text reported for any malformed `redirects` value.
pub const INVALID_REDIRECTS: &str =
    "The \"redirects\" option must be set to an object with string values.";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("The \"redirects\" option must be set to an object with string values.")]
    InvalidRedirects,
    #[error("Unknown option: {0}")]
    UnknownOption(String),
    #[error("Option {0} may only be set in a config file")]
    ConfigFileOnly(String),
    #[error("Option {0} is already declared")]
    DuplicateOption(String),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Check that `value` is a mapping from string to string.
///
/// Absent values, `null`, arrays, and scalars are rejected, as is any mapping
/// holding a non-string value. Nothing is transformed.
pub fn validate(value: Option<&Value>) -> Result<(), ConfigError> {
    let Some(Value::Object(map)) = value else {
        return Err(ConfigError::InvalidRedirects);
    };
    if map.values().all(Value::is_string) {
        Ok(())
    } else {
        Err(ConfigError::InvalidRedirects)
    }
}

/// Validated mapping of old source paths to new targets.
///
/// Entries are kept sorted by source path so emission order and reports are
/// stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectMap(BTreeMap<String, String>);

impl RedirectMap {
    /// Validate a raw option value and convert it in one step.
    pub fn from_value(value: Option<&Value>) -> Result<Self, ConfigError> {
        validate(value)?;
        let map = value
            .and_then(Value::as_object)
            .into_iter()
            .flatten()
            .filter_map(|(from, to)| to.as_str().map(|to| (from.clone(), to.to_string())))
            .collect();
        Ok(Self(map))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.0.get(source).map(String::as_str)
    }

    /// Iterate `(source_path, target)` pairs in source-path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(from, to)| (from.as_str(), to.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RedirectMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        )
    }
}

/// Emission settings from the `[emit]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmitConfig {
    /// Maximum number of redirect files written in parallel.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

impl EmitConfig {
    /// Parse an `[emit]` option value. Absent or `null` means defaults.
    pub fn from_value(value: Option<&Value>) -> Result<Self, ConfigError> {
        let config: EmitConfig = match value {
            None | Some(Value::Null) => Self::default(),
            Some(v) => serde_json::from_value(v.clone())?,
        };
        if config.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "emit.max_processes must be at least 1".into(),
            ));
        }
        Ok(config)
    }
}

/// Validator for the `emit` option declaration.
pub fn validate_emit(value: Option<&Value>) -> Result<(), ConfigError> {
    EmitConfig::from_value(value).map(|_| ())
}

/// Resolve the effective writer count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &EmitConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Load a config file as a table of raw option values.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if it exists but is not valid TOML/JSON, or its top level is
/// not a table.
pub fn load_raw_config(path: &Path) -> Result<Option<Map<String, Value>>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let value: Value = if is_json {
        serde_json::from_str(&content)?
    } else {
        toml::from_str(&content)?
    };
    match value {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(ConfigError::Validation(format!(
            "{} must contain a table of options",
            path.display()
        ))),
    }
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# doc-redirects configuration
# ===========================
# All settings are optional. An empty file emits no redirects.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Redirects
# ---------------------------------------------------------------------------
# Old path (relative to the output directory) = new target.
#
# Keys ending in "/" are directories: the redirect is written to index.html
# inside them.
#
# Targets starting with "/", "http://" or "https://" are used verbatim.
# Any other target is resolved against the output directory and written as a
# path relative to the redirect page.
[redirects]
# "old.html" = "new.html"
# "guide/" = "/docs/guide/"
# "api.html" = "https://example.com/api/"

# ---------------------------------------------------------------------------
# Emission
# ---------------------------------------------------------------------------
[emit]
# Maximum parallel writers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
