//! Configuration validation logic
//!
//! Checks that loaded values are within acceptable ranges before they reach
//! the transport or the logger.

use http::HeaderValue;

use crate::config::error::ConfigError;
use crate::config::settings::{ClientConfig, FileSettings, LoggerSettings, Settings};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ClientConfig {
    /// Validate client configuration
    ///
    /// # Validation Rules
    /// - Request and connect timeouts must be greater than 0
    /// - Connect timeout must not exceed the request timeout
    /// - User agent and default content type must be non-empty, valid header values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "client.timeout_seconds",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "client.connect_timeout_seconds",
                "Connect timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout_seconds > self.timeout_seconds {
            return Err(ConfigError::validation(
                "client.connect_timeout_seconds",
                format!(
                    "Connect timeout ({}s) cannot exceed the request timeout ({}s).",
                    self.connect_timeout_seconds, self.timeout_seconds
                ),
            ));
        }

        validate_header_value("client.user_agent", &self.user_agent)?;
        validate_header_value("client.default_content_type", &self.default_content_type)?;

        Ok(())
    }
}

fn validate_header_value(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::validation(field, "Value cannot be empty."));
    }
    HeaderValue::from_str(value).map_err(|_| {
        ConfigError::validation(
            field,
            format!("'{}' is not a valid HTTP header value.", value),
        )
    })?;
    Ok(())
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - At least one output must be enabled
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all sections, returning the first error encountered
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.client.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}
