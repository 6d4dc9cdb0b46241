//! Logger built on `tracing-subscriber`
//!
//! - Console output with color control (to stderr, so command output on
//!   stdout stays machine-readable)
//! - Optional file output in Full, Compact or JSON format
//! - Level filtering through `EnvFilter`

pub mod config;
pub mod error;


pub use config::*;
pub use error::LoggerError;

use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::sync::Mutex;

use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber described by `config`.
///
/// Fails if the configuration is invalid, the log file cannot be opened, or
/// a global subscriber is already set.
pub fn init_logger(config: LoggerConfig) -> anyhow::Result<()> {
    config.validate()?;

    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(build_layers(&config)?)
        .with(filter)
        .try_init()
        .map_err(|e| LoggerError::AlreadyInitialized {
            message: e.to_string(),
        })?;

    Ok(())
}

/// Output layers without the level filter.
///
/// The file layer comes first: the first layer's ANSI setting leaks into
/// span field formatting, and the file must never contain escape codes
/// (tokio-rs/tracing#1817).
pub(crate) fn build_layers(config: &LoggerConfig) -> Result<Vec<BoxedLayer>, LoggerError> {
    let mut layers = Vec::new();
    if config.file.enabled {
        layers.push(file_layer(&config.file)?);
    }
    if config.console.enabled {
        layers.push(console_layer(&config.console));
    }
    Ok(layers)
}

fn console_layer(config: &ConsoleConfig) -> BoxedLayer {
    let use_ansi = config.colored && std::io::stderr().is_terminal();

    fmt::layer()
        .with_ansi(use_ansi)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .boxed()
}

fn file_layer(config: &FileConfig) -> Result<BoxedLayer, LoggerError> {
    let writer = Mutex::new(open_log_file(config)?);
    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer);

    Ok(match config.format {
        LogFormat::Full => layer.boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    })
}

/// Open the log file, creating missing parent directories
pub(crate) fn open_log_file(config: &FileConfig) -> Result<File, LoggerError> {
    let open_error = |source| LoggerError::OpenFile {
        path: config.path.clone(),
        source,
    };

    if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(open_error)?;
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if config.append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    options.open(&config.path).map_err(open_error)
}
