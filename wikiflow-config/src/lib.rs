//! Shared configuration loader for the wikiflow toolchain.
//!
//! `defaults/wikiflow.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files on
//! top of those defaults via [`Loader`] before deserializing into
//! [`WikiflowConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use wikiflow::common::headings::NormalizeOptions;

const DEFAULT_TOML: &str = include_str!("../defaults/wikiflow.default.toml");

/// Top-level configuration consumed by wikiflow applications.
#[derive(Debug, Clone, Deserialize)]
pub struct WikiflowConfig {
    pub normalize: NormalizeConfig,
    pub inspect: InspectConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
}

/// Mirrors the names the heading normalizer works with.
#[derive(Debug, Clone, Deserialize)]
pub struct NormalizeConfig {
    pub outline_context: String,
    pub text_attribute: String,
    pub level_attribute: String,
}

impl From<NormalizeConfig> for NormalizeOptions {
    fn from(config: NormalizeConfig) -> Self {
        NormalizeOptions {
            outline_context: config.outline_context,
            text_attribute: config.text_attribute,
            level_attribute: config.level_attribute,
        }
    }
}

impl From<&NormalizeConfig> for NormalizeOptions {
    fn from(config: &NormalizeConfig) -> Self {
        NormalizeOptions {
            outline_context: config.outline_context.clone(),
            text_attribute: config.text_attribute.clone(),
            level_attribute: config.level_attribute.clone(),
        }
    }
}

/// Controls the tag view.
#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub show_spans: bool,
    pub show_attributes: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub pretty: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// A `log::LevelFilter` name.
    pub level: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<WikiflowConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<WikiflowConfig, ConfigError> {
    Loader::new().build()
}
