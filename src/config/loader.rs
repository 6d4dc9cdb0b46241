//! Configuration loader for cache-fetcher
//!
//! `ConfigLoader` merges configuration files and environment variables in
//! precedence order and returns validated [`Settings`].

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for the configuration directory
const CONFIG_DIR_ENV: &str = "CACHE_FETCHER_CONFIG_DIR";

/// Environment variable for a single configuration file
const CONFIG_FILE_ENV: &str = "CACHE_FETCHER_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

/// Prefix for configuration overrides from the environment
const ENV_PREFIX: &str = "CACHE_FETCHER";

/// Separator for nested keys: `CACHE_FETCHER_CLIENT__TIMEOUT_SECONDS` -> `client.timeout_seconds`
const ENV_SEPARATOR: &str = "__";

/// Layered configuration loader
///
/// Sources, lowest to highest priority:
/// 1. `default.toml`
/// 2. `{environment}.toml`
/// 3. `local.toml`
/// 4. `CACHE_FETCHER_*` environment variables
///
/// All files are optional; missing keys fall back to the defaults in
/// [`Settings`]. In single-file mode the given file replaces the three
/// layered files and must exist.
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a loader from `CACHE_FETCHER_CONFIG_DIR`, `CACHE_FETCHER_CONFIG_FILE`
    /// and `CACHE_FETCHER_APP_ENV`
    ///
    /// # Errors
    ///
    /// Returns an error if both `CACHE_FETCHER_CONFIG_DIR` and
    /// `CACHE_FETCHER_CONFIG_FILE` are set, or if the environment name is invalid.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from);
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_dir.is_some() && config_file.is_some() {
            return Err(ConfigError::mutual_exclusivity(format!(
                "{} and {} cannot both be set. Use {} for layered configuration or \
                 {} for a single configuration file.",
                CONFIG_DIR_ENV, CONFIG_FILE_ENV, CONFIG_DIR_ENV, CONFIG_FILE_ENV
            )));
        }

        Ok(Self {
            config_dir: config_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env()?,
        })
    }

    /// Load exactly this file instead of the layered files
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Override the environment used to pick `{environment}.toml`
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load and validate settings from all sources
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;

        tracing::debug!(
            environment = %self.environment,
            config_file = ?self.config_file,
            "Configuration loaded"
        );
        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = match &self.config_file {
            Some(config_file) => {
                if !config_file.is_file() {
                    return Err(ConfigError::FileNotFound(config_file.clone()));
                }
                Self::add_file_source(Config::builder(), config_file, true)
            }
            None => self.add_layered_sources(Config::builder()),
        };

        Self::add_env_source(builder)
            .build()
            .map_err(ConfigError::from)
    }

    fn add_layered_sources(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> ConfigBuilder<DefaultState> {
        let layers = [
            self.config_dir.join("default.toml"),
            self.config_dir
                .join(format!("{}.toml", self.environment.as_str())),
            self.config_dir.join("local.toml"),
        ];

        layers
            .iter()
            .fold(builder, |builder, path| Self::add_file_source(builder, path, false))
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> ConfigBuilder<DefaultState> {
        builder.add_source(File::from(path).format(FileFormat::Toml).required(required))
    }

    fn add_env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        )
    }
}
