//! Configuration module for Sumi-Politeness
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sumi_politeness::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("politeness.toml")).unwrap();
//! println!("Workers: {}", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, RobotsConfig, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
