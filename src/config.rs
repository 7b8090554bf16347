use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use validator::Validate;

use crate::models::Strategy;

/// Errors that can occur while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Application configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[validate(range(min = 1))]
    #[serde(default = "default_num_rounds")]
    pub num_rounds: usize,
    /// Shuffle table order within each round before display
    #[serde(default = "default_true")]
    pub enable_random_table_randomization: bool,
    /// Scramble the roster before generating any rounds
    #[serde(default = "default_true")]
    pub shuffle_roster: bool,
    #[serde(default)]
    pub random_seed: Option<u64>,
    #[validate(length(min = 1))]
    #[serde(default = "default_csv_filename")]
    pub csv_filename: String,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub logging: LoggingSettings,
}

fn default_num_rounds() -> usize { 5 }
fn default_true() -> bool { true }
fn default_csv_filename() -> String { "names.csv".to_string() }
fn default_output_dir() -> PathBuf { PathBuf::from(".") }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config.yaml in the working directory)
    /// 3. Explicit configuration file, when given
    /// 4. Environment variables (prefixed with PAIRS__)
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let settings: Settings = builder
            // e.g., PAIRS__NUM_ROUNDS -> num_rounds
            .add_source(
                Environment::with_prefix("PAIRS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a single file, ignoring the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            num_rounds: default_num_rounds(),
            enable_random_table_randomization: true,
            shuffle_roster: true,
            random_seed: None,
            csv_filename: default_csv_filename(),
            strategy: Strategy::default(),
            output_dir: default_output_dir(),
            logging: LoggingSettings::default(),
        }
    }
}
