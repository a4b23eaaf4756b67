//! Crawler module for planning polite fetches
//!
//! This module wires the configuration to the politeness core:
//! - Loading the host's robots directives, with an optional crawl-delay override
//! - Resolving configured URLs to request paths
//! - Running a worker pool that reserves fetch slots on the shared directives

mod scheduler;

pub use scheduler::{plan_fetches, FetchDecision, Verdict};

use crate::config::Config;
use crate::robots::{load_directives, HostDirectives};
use crate::url::{parse_base_url, request_path};
use crate::{PolitenessError, Result};
use std::path::Path;
use std::sync::Arc;

/// Builds the host directives described by the configuration
///
/// The robots.txt path is resolved relative to `config_dir`. A configured
/// `crawl-delay-ms` replaces whatever Crawl-delay the file declares.
pub fn build_directives(
    config: &Config,
    config_dir: &Path,
) -> Result<HostDirectives> {
    let robots_path = config.robots.resolve_path(config_dir);
    let mut directives = load_directives(&robots_path, &config.crawler.user_agent)?;

    if let Some(delay) = config.robots.crawl_delay_override() {
        tracing::info!("Overriding crawl delay with {:?}", delay);
        directives.set_crawl_delay(delay);
    }

    tracing::info!(
        "Directives ready: {} allow, {} disallow, crawl delay {:?}",
        directives.allow_rules().len(),
        directives.disallow_rules().len(),
        directives.crawl_delay()
    );

    Ok(directives)
}

/// Resolves the configured site paths to request paths
pub fn resolve_paths(config: &Config) -> Result<Vec<String>> {
    let base = parse_base_url(&config.site.base_url)?;
    config
        .site
        .paths
        .iter()
        .map(|path| request_path(&base, path).map_err(PolitenessError::from))
        .collect()
}

/// Runs a complete pacing plan
///
/// This is the main entry point: it loads the directives, resolves the site's
/// paths and runs them through the worker pool.
///
/// # Example
///
/// ```no_run
/// use sumi_politeness::config::load_config;
/// use sumi_politeness::crawler::run_plan;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("politeness.toml"))?;
/// let decisions = run_plan(&config, Path::new(".")).await?;
/// println!("{} fetches planned", decisions.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_plan(
    config: &Config,
    config_dir: &Path,
) -> Result<Vec<FetchDecision>> {
    let directives = Arc::new(build_directives(config, config_dir)?);
    let paths = resolve_paths(config)?;

    plan_fetches(
        directives,
        paths,
        config.crawler.workers as usize,
        config.crawler.wait_for_delay,
    )
    .await
}
