//! Redirect plugin: hooks redirect emission into a host [`Application`].
//!
//! [`load`] does two things:
//!
//! 1. Declares the `redirects` option (config-file only, default `{}`,
//!    validated by [`config::validate`]) and the `emit` option.
//! 2. Subscribes to the end-of-rendering hook. When rendering finishes, the
//!    current option values are read and every redirect is written into the
//!    event's output directory.
//!
//! Validation runs when the config file is read, so a malformed redirect map
//! fails the run before any page is rendered.

use crate::config::{self, ConfigError, EmitConfig, RedirectMap};
use crate::emit::{self, EmitReport};
use crate::host::{Application, OptionDeclaration};
use serde_json::json;

/// Name of the redirect map option.
pub const REDIRECTS_OPTION: &str = "redirects";

/// Name of the emission settings option.
pub const EMIT_OPTION: &str = "emit";

/// Declare the redirect options and subscribe emission to the end hook.
pub fn load(app: &mut Application) -> Result<(), ConfigError> {
    load_with(app, |_| {})
}

/// Like [`load`], but hands each emission report to `on_report`.
pub fn load_with<F>(app: &mut Application, mut on_report: F) -> Result<(), ConfigError>
where
    F: FnMut(&EmitReport) + 'static,
{
    app.options.declare(OptionDeclaration {
        name: REDIRECTS_OPTION,
        help: "Define redirects to write to the generated output directory.",
        default: json!({}),
        config_file_only: true,
        validate: config::validate,
    })?;
    app.options.declare(OptionDeclaration {
        name: EMIT_OPTION,
        help: "Control how redirect pages are written (max_processes).",
        default: json!({}),
        config_file_only: true,
        validate: config::validate_emit,
    })?;

    app.renderer.on_end(Box::new(move |options, event| {
        let redirects = RedirectMap::from_value(options.get_value(REDIRECTS_OPTION))?;
        let emit_config = EmitConfig::from_value(options.get_value(EMIT_OPTION))?;
        let report = emit::emit_with(&redirects, &event.output_directory, &emit_config)?;
        on_report(&report);
        Ok(())
    }));
    Ok(())
}
