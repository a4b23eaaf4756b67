//! Robots.txt reader
//!
//! This module turns robots.txt text into a [`HostDirectives`] for one user
//! agent. It understands `User-agent`, `Allow`, `Disallow` and `Crawl-delay`
//! lines; everything else is skipped. Paths are stored verbatim and matched as
//! literal prefixes.

use crate::robots::clock::{Clock, SystemClock};
use crate::robots::HostDirectives;
use crate::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Rules collected for one `User-agent` group
#[derive(Debug, Default)]
struct Group {
    agents: Vec<String>,
    allow: Vec<String>,
    disallow: Vec<String>,
    crawl_delay: Option<Duration>,
}

impl Group {
    fn is_wildcard(&self) -> bool {
        self.agents.iter().any(|agent| agent == "*")
    }

    fn names(&self, user_agent: &str) -> bool {
        self.agents
            .iter()
            .any(|agent| agent != "*" && user_agent.contains(agent.as_str()))
    }
}

/// Parses robots.txt content into directives for `user_agent`
///
/// Groups naming the crawler (case-insensitive substring of `user_agent`) take
/// precedence over `*` groups. If several groups apply at the same level,
/// their rules are merged and the last crawl delay wins.
///
/// # Examples
///
/// ```
/// use sumi_politeness::robots::parse_directives;
///
/// let directives = parse_directives("User-agent: *\nDisallow: /admin", "sumi-bot");
/// assert!(directives.allowed_in("/admin/users").is_none());
/// assert!(directives.allowed_in("/about").is_some());
/// ```
pub fn parse_directives(content: &str, user_agent: &str) -> HostDirectives {
    parse_directives_with_clock(content, user_agent, Arc::new(SystemClock))
}

/// Like [`parse_directives`], reading time from `clock`
pub fn parse_directives_with_clock(
    content: &str,
    user_agent: &str,
    clock: Arc<dyn Clock>,
) -> HostDirectives {
    let groups = parse_groups(content);
    let normalized_agent = user_agent.to_lowercase();

    let mut selected: Vec<&Group> = groups
        .iter()
        .filter(|group| group.names(&normalized_agent))
        .collect();
    if selected.is_empty() {
        selected = groups.iter().filter(|group| group.is_wildcard()).collect();
    }

    let mut directives = HostDirectives::with_clock(clock);
    let mut crawl_delay = None;
    for group in selected {
        for path in &group.allow {
            directives.add_allow(path.as_str());
        }
        for path in &group.disallow {
            directives.add_disallow(path.as_str());
        }
        if group.crawl_delay.is_some() {
            crawl_delay = group.crawl_delay;
        }
    }
    if let Some(delay) = crawl_delay {
        directives.set_crawl_delay(delay);
    }

    directives
}

/// Reads a robots.txt file from disk and parses it for `user_agent`
pub fn load_directives(path: &Path, user_agent: &str) -> Result<HostDirectives> {
    let content = std::fs::read_to_string(path)?;
    tracing::info!(
        "Loaded robots.txt from {} ({} bytes)",
        path.display(),
        content.len()
    );
    Ok(parse_directives(&content, user_agent))
}

fn parse_groups(content: &str) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    // A User-agent line following rule lines starts a new group
    let mut in_rules = true;

    for (number, line) in content.lines().enumerate() {
        let line = match line.split_once('#') {
            Some((before, _)) => before,
            None => line,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            tracing::warn!("Ignoring malformed robots.txt line {}: {:?}", number + 1, trimmed);
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();

        if key == "user-agent" {
            if in_rules {
                groups.push(Group::default());
                in_rules = false;
            }
            // A blank agent opens a group that applies to no crawler
            if let Some(group) = groups.last_mut().filter(|_| !value.is_empty()) {
                group.agents.push(value.to_lowercase());
            }
            continue;
        }

        let Some(group) = groups.last_mut() else {
            tracing::debug!("Ignoring {} outside of any User-agent group", key);
            continue;
        };

        match key.as_str() {
            "allow" => group.allow.push(value.to_string()),
            // An empty Disallow allows everything
            "disallow" if value.is_empty() => {}
            "disallow" => group.disallow.push(value.to_string()),
            "crawl-delay" => match parse_crawl_delay(value) {
                Some(delay) => group.crawl_delay = Some(delay),
                None => tracing::warn!("Ignoring invalid Crawl-delay value: {:?}", value),
            },
            _ => {
                tracing::debug!("Skipping unsupported robots.txt directive: {}", key);
                continue;
            }
        }
        in_rules = true;
    }

    groups
}

/// Parses a Crawl-delay value given in (possibly fractional) seconds
fn parse_crawl_delay(value: &str) -> Option<Duration> {
    let seconds: f64 = value.parse().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}
