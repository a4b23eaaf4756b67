//! Sumi-Politeness: per-host crawl courtesy
//!
//! This crate decides whether a path on a remote host may be fetched under the
//! host's robots directives, and paces fetches so that a host's crawl delay is
//! respected even when many workers share the same host.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Politeness operations
#[derive(Debug, Error)]
pub enum PolitenessError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("URL {url} does not belong to host {expected}")]
    ForeignHost { url: String, expected: String },
}

/// Result type alias for Sumi-Politeness operations
pub type Result<T> = std::result::Result<T, PolitenessError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use robots::{Clock, HostDirectives, ManualClock, RuleSet, SystemClock};
