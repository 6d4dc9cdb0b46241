//! CLI argument validation functions
//!
//! Custom value parsers for arguments that clap cannot validate on its own.

use std::fs;
use std::path::PathBuf;

use http::{HeaderName, HeaderValue};
use url::Url;

/// Validate that a file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!("Cannot read configuration file '{}': {}", path_str, e)),
    }
}

/// Accept absolute http and https URLs, returned exactly as typed.
///
/// The string is the cache key, so it is not normalized.
pub fn validate_url(url_str: &str) -> Result<String, String> {
    let url = Url::parse(url_str).map_err(|e| format!("Invalid URL '{}': {}", url_str, e))?;

    match url.scheme() {
        "http" | "https" => Ok(url_str.to_string()),
        scheme => Err(format!(
            "Unsupported URL scheme '{}'. Only http and https are supported",
            scheme
        )),
    }
}

/// Parse a `Name: value` header
pub fn parse_header(header: &str) -> Result<(String, String), String> {
    let (name, value) = header
        .split_once(':')
        .ok_or_else(|| format!("Header must look like 'Name: value', got: '{}'", header))?;
    let (name, value) = (name.trim(), value.trim());

    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| format!("Invalid header name: '{}'", name))?;
    HeaderValue::from_str(value).map_err(|_| format!("Invalid value for header '{}'", name))?;

    Ok((name.to_string(), value.to_string()))
}

/// Validate a timeout in whole seconds, greater than 0
pub fn validate_timeout(secs: &str) -> Result<u64, String> {
    let secs: u64 = secs
        .parse()
        .map_err(|_| format!("Timeout must be a positive number of seconds, got: '{}'", secs))?;
    if secs == 0 {
        return Err("Timeout must be greater than 0".to_string());
    }
    Ok(secs)
}

/// Validate the repeat count (1-1000)
pub fn validate_repeat(count: &str) -> Result<u32, String> {
    let count: u32 = count
        .parse()
        .map_err(|_| format!("Repeat count must be a positive number, got: '{}'", count))?;

    if !(1..=1000).contains(&count) {
        return Err("Repeat count must be between 1 and 1000".to_string());
    }

    Ok(count)
}
