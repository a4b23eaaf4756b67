use crate::config::types::{Config, CrawlerConfig, RobotsConfig, SiteConfig};
use crate::url::{parse_base_url, request_path};
use crate::{ConfigError, ConfigResult};

/// Upper bound on concurrent workers per host
const MAX_WORKERS: u32 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_robots_config(&config.robots)?;
    validate_site_config(&config.site)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    validate_user_agent(&config.user_agent)
}

/// Validates the robots.txt source
fn validate_robots_config(config: &RobotsConfig) -> ConfigResult<()> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "robots path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates the site base URL and every planned path
fn validate_site_config(config: &SiteConfig) -> ConfigResult<()> {
    let base = parse_base_url(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    for path in &config.paths {
        request_path(&base, path)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid path '{}': {}", path, e)))?;
    }

    Ok(())
}

/// User agent: non-empty product token, optionally with a version
fn validate_user_agent(user_agent: &str) -> ConfigResult<()> {
    if user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if !user_agent
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '/' | '.'))
    {
        return Err(ConfigError::Validation(format!(
            "user-agent must contain only alphanumeric characters and '-', '_', '/', '.', got '{}'",
            user_agent
        )));
    }

    Ok(())
}
