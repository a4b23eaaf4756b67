use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for Sumi-Politeness
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub robots: RobotsConfig,
    pub site: SiteConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// User agent used to select the robots.txt group
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Number of concurrent workers sharing the host
    pub workers: u32,

    /// Whether workers actually sleep for the suggested delay
    #[serde(rename = "wait-for-delay", default)]
    pub wait_for_delay: bool,
}

/// Robots directives source
#[derive(Debug, Clone, Deserialize)]
pub struct RobotsConfig {
    /// Path to a local robots.txt file for the host
    pub path: String,

    /// Crawl delay override in milliseconds, replacing any Crawl-delay in the file
    #[serde(rename = "crawl-delay-ms", default)]
    pub crawl_delay_ms: Option<u64>,
}

/// The host being crawled and the URLs to plan
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL of the host (e.g., "https://example.com")
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// URLs or paths to fetch, relative to the base URL
    #[serde(default)]
    pub paths: Vec<String>,
}

impl RobotsConfig {
    /// Resolves the robots.txt path relative to the directory holding the config file
    pub fn resolve_path(&self, config_dir: &Path) -> PathBuf {
        let path = Path::new(&self.path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            config_dir.join(path)
        }
    }

    /// Returns the crawl delay override, if configured
    pub fn crawl_delay_override(&self) -> Option<Duration> {
        self.crawl_delay_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn robots(path: &str, crawl_delay_ms: Option<u64>) -> RobotsConfig {
        RobotsConfig {
            path: path.to_string(),
            crawl_delay_ms,
        }
    }

    #[test]
    fn test_resolve_relative_path() {
        let config = robots("robots.txt", None);
        assert_eq!(
            config.resolve_path(Path::new("/etc/sumi")),
            PathBuf::from("/etc/sumi/robots.txt")
        );
    }

    #[test]
    fn test_resolve_absolute_path() {
        let config = robots("/srv/robots.txt", None);
        assert_eq!(
            config.resolve_path(Path::new("/etc/sumi")),
            PathBuf::from("/srv/robots.txt")
        );
    }

    #[test]
    fn test_crawl_delay_override() {
        assert_eq!(robots("r", None).crawl_delay_override(), None);
        assert_eq!(
            robots("r", Some(1500)).crawl_delay_override(),
            Some(Duration::from_millis(1500))
        );
    }
}
