//! Configuration error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating, reading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist
    #[error("Configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The merged sources could not be deserialized into settings
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Validation error: {field} - {message}")]
    ValidationError { field: String, message: String },

    /// An environment variable steering the loader holds an invalid value
    #[error("Environment variable error: {0}")]
    EnvVarError(String),

    /// Two options that cannot be combined were both given
    #[error("Mutual exclusivity error: {0}")]
    MutualExclusivityError(String),

    #[error("Configuration error: {0}")]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn mutual_exclusivity(message: impl Into<String>) -> Self {
        ConfigError::MutualExclusivityError(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let error = ConfigError::validation("client.timeout_seconds", "must be positive");
        assert_eq!(
            error.to_string(),
            "Validation error: client.timeout_seconds - must be positive"
        );
    }

    #[test]
    fn test_file_not_found_display() {
        let error = ConfigError::FileNotFound(PathBuf::from("/etc/missing.toml"));
        assert!(error.to_string().contains("/etc/missing.toml"));
    }
}
