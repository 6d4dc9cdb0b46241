//! CLI module for cache-fetcher
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing with clap
//! - Configuration loading with CLI overrides
//! - Request execution, one subcommand per HTTP verb

pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

// Re-export public types for convenience
pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment};

use crate::config::ConfigLoader;
use crate::config::settings::Settings;
use crate::logger::init_logger;

/// Load settings and apply CLI overrides.
///
/// `--config` replaces the layered files with a single file, `--env` picks
/// the environment layer, and `--verbose`/`--quiet` override the log level.
pub fn load_config(cli: &Cli) -> anyhow::Result<Settings> {
    let mut loader = ConfigLoader::new()?;
    if let Some(path) = &cli.config {
        loader = loader.with_config_file(path);
    }
    if let Some(env) = cli.env {
        loader = loader.with_environment(env.into());
    }

    let mut settings = loader.load()?;
    apply_cli_overrides(&mut settings, cli);
    settings.validate()?;
    Ok(settings)
}

/// Apply flag overrides that take precedence over every config source
pub fn apply_cli_overrides(settings: &mut Settings, cli: &Cli) {
    if cli.verbose {
        settings.logger.level = "debug".to_string();
    } else if cli.quiet {
        settings.logger.level = "error".to_string();
    }
}

/// Initialize the global logger from settings
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<()> {
    let logger_config = settings.logger.clone().into_logger_config()?;
    init_logger(logger_config)
}
