//! Host-side interfaces a redirect plugin plugs into.
//!
//! A documentation generator exposes two things to plugins:
//!
//! - an [`Options`] registry, where plugins declare named options (help text,
//!   default, validator) before the config file is read; and
//! - a [`Renderer`], whose end-of-rendering hook fires once after every page
//!   has been written, carrying the output directory.
//!
//! [`Application`] bundles both. The CLI drives an `Application` as a
//! minimal host; a larger generator embeds the same types. The CLI takes no
//! option flags, so [`Options::set_from_cli`] is only reached by embedding
//! hosts that forward command-line options.
//!
//! ```text
//! plugin::load(&mut app)            declare options, subscribe to end hook
//! app.options.read_config_file(..)  validate each option as it is read
//! app.render_end(event)             run end hooks (emit redirects)
//! ```

use crate::config::{self, ConfigError};
use crate::emit::EmitError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// Validator run against every value assigned to an option.
pub type Validator = fn(Option<&Value>) -> Result<(), ConfigError>;

/// A named, validated option declared by a plugin.
#[derive(Debug, Clone)]
pub struct OptionDeclaration {
    pub name: &'static str,
    pub help: &'static str,
    /// Value reported until the option is set.
    pub default: Value,
    /// Reject attempts to set the option anywhere but a config file.
    pub config_file_only: bool,
    pub validate: Validator,
}

/// Option registry: declarations plus the values assigned so far.
#[derive(Debug, Default)]
pub struct Options {
    declarations: BTreeMap<&'static str, OptionDeclaration>,
    values: BTreeMap<String, Value>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an option. Names must be unique.
    pub fn declare(&mut self, declaration: OptionDeclaration) -> Result<(), ConfigError> {
        if self.declarations.contains_key(declaration.name) {
            return Err(ConfigError::DuplicateOption(declaration.name.to_string()));
        }
        self.declarations.insert(declaration.name, declaration);
        Ok(())
    }

    /// Declared options in name order.
    pub fn declarations(&self) -> impl Iterator<Item = &OptionDeclaration> {
        self.declarations.values()
    }

    /// Read a config file and assign every option it sets.
    ///
    /// Returns `Ok(false)` when the file does not exist; all options keep
    /// their defaults.
    pub fn read_config_file(&mut self, path: &Path) -> Result<bool, ConfigError> {
        match config::load_raw_config(path)? {
            Some(table) => {
                self.set_config_values(table)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Assign option values read from a config file.
    ///
    /// Every key must be a declared option and every value must pass its
    /// option's validator. Nothing is assigned if any key fails.
    pub fn set_config_values(&mut self, table: Map<String, Value>) -> Result<(), ConfigError> {
        for (name, value) in &table {
            let declaration = self.declaration(name)?;
            (declaration.validate)(Some(value))?;
        }
        self.values.extend(table);
        Ok(())
    }

    /// Assign an option from the command line.
    pub fn set_from_cli(&mut self, name: &str, value: Value) -> Result<(), ConfigError> {
        let declaration = self.declaration(name)?;
        if declaration.config_file_only {
            return Err(ConfigError::ConfigFileOnly(name.to_string()));
        }
        (declaration.validate)(Some(&value))?;
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Current value of a declared option, falling back to its default.
    pub fn get_value(&self, name: &str) -> Option<&Value> {
        self.values
            .get(name)
            .or_else(|| self.declarations.get(name).map(|d| &d.default))
    }

    fn declaration(&self, name: &str) -> Result<&OptionDeclaration, ConfigError> {
        self.declarations
            .get(name)
            .ok_or_else(|| ConfigError::UnknownOption(name.to_string()))
    }
}

/// Fired once when all output for a run has been written.
#[derive(Debug, Clone)]
pub struct RendererEvent {
    pub output_directory: PathBuf,
}

/// Handler subscribed to the end-of-rendering hook.
pub type EndHandler = Box<dyn FnMut(&Options, &RendererEvent) -> Result<(), HostError>>;

/// End-of-rendering hook.
#[derive(Default)]
pub struct Renderer {
    end_handlers: Vec<EndHandler>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_end(&mut self, handler: EndHandler) {
        self.end_handlers.push(handler);
    }

    /// Run end handlers in registration order. The first error stops the run.
    pub fn finish(&mut self, options: &Options, event: &RendererEvent) -> Result<(), HostError> {
        for handler in &mut self.end_handlers {
            handler(options, event)?;
        }
        Ok(())
    }
}

/// A host: option registry plus renderer.
#[derive(Default)]
pub struct Application {
    pub options: Options,
    pub renderer: Renderer,
}

impl Application {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal that rendering into `event.output_directory` has finished.
    pub fn render_end(&mut self, event: &RendererEvent) -> Result<(), HostError> {
        self.renderer.finish(&self.options, event)
    }
}
