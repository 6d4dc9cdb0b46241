//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::Environment as AppEnvironment;

/// Cache-backed HTTP client
#[derive(Parser, Debug)]
#[command(name = "cache-fetcher")]
#[command(about = "Cache-backed HTTP client with uniform result envelopes")]
#[command(long_about = "
cache-fetcher sends HTTP requests through a client that caches GET responses
by URL and invalidates them whenever a POST, PUT, PATCH or DELETE targets the
same URL. Every result is printed as a JSON envelope with data, isError and
error fields.

EXAMPLES:
    # Fetch a resource
    cache-fetcher get https://jsonplaceholder.typicode.com/todos/1

    # Fetch it three times; only the first call reaches the network
    cache-fetcher -v get https://jsonplaceholder.typicode.com/todos/1 --repeat 3

    # Create a resource from JSON
    cache-fetcher post https://jsonplaceholder.typicode.com/posts \\
        --data '{\"title\":\"foo\",\"userId\":1}'

    # Send a form, reading the body from a file
    cache-fetcher put https://example.com/form --data @form.txt \\
        --content-type application/x-www-form-urlencoded

    # Inspect headers with an extra request header
    cache-fetcher head https://example.com -H 'Accept: text/html'
")]
#[command(version = crate::build::CLAP_LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Load only this TOML file instead of the layered files in the
    /// configuration directory. Environment variable overrides still apply.
    #[arg(short, long, global = true, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` is layered over `default.toml`.
    #[arg(short, long, global = true, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Sets the log level to debug, showing cache hits, misses and
    /// invalidations. Cannot be used with --quiet.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Sets the log level to error. Cannot be used with --verbose.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// One subcommand per HTTP verb
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a URL with GET, answering from the cache when possible
    Get(RequestArgs),
    /// Send a body with POST and invalidate the URL
    Post(BodyArgs),
    /// Send a body with PUT and invalidate the URL
    Put(BodyArgs),
    /// Send a body with PATCH and invalidate the URL
    Patch(BodyArgs),
    /// Send DELETE and invalidate the URL
    Delete(RequestArgs),
    /// Fetch status and headers with HEAD
    Head(RequestArgs),
    /// Fetch the server's supported methods with OPTIONS
    Options(RequestArgs),
}

/// Arguments shared by every verb
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Absolute http or https URL; also the cache key
    #[arg(value_parser = super::validation::validate_url)]
    pub url: String,

    /// Extra request header, repeatable
    ///
    /// Example: -H 'Authorization: Bearer token'
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE", value_parser = super::validation::parse_header)]
    pub headers: Vec<(String, String)>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = super::validation::validate_timeout)]
    pub timeout: Option<u64>,

    /// Issue the same call N times through one client
    #[arg(long, value_name = "N", default_value_t = 1, value_parser = super::validation::validate_repeat)]
    pub repeat: u32,
}

/// Arguments for verbs that send a body
#[derive(Args, Debug, Clone)]
pub struct BodyArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Request body; `@path` reads it from a file
    ///
    /// With a JSON content type the text is parsed as JSON when possible.
    /// With multipart/form-data it is read as `name=value&...` fields.
    #[arg(short, long, value_name = "BODY")]
    pub data: Option<String>,

    /// Content type that selects the body formatting
    ///
    /// Defaults to `client.default_content_type` from the configuration.
    #[arg(long, value_name = "TYPE")]
    pub content_type: Option<String>,
}

impl Commands {
    /// Arguments common to every verb
    pub fn request(&self) -> &RequestArgs {
        match self {
            Commands::Get(args)
            | Commands::Delete(args)
            | Commands::Head(args)
            | Commands::Options(args) => args,
            Commands::Post(args) | Commands::Put(args) | Commands::Patch(args) => &args.request,
        }
    }

    pub fn method(&self) -> http::Method {
        match self {
            Commands::Get(_) => http::Method::GET,
            Commands::Post(_) => http::Method::POST,
            Commands::Put(_) => http::Method::PUT,
            Commands::Patch(_) => http::Method::PATCH,
            Commands::Delete(_) => http::Method::DELETE,
            Commands::Head(_) => http::Method::HEAD,
            Commands::Options(_) => http::Method::OPTIONS,
        }
    }
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

impl From<Environment> for AppEnvironment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => AppEnvironment::Development,
            Environment::Test => AppEnvironment::Test,
            Environment::Staging => AppEnvironment::Staging,
            Environment::Production => AppEnvironment::Production,
        }
    }
}
