//! Integration tests for the politeness core
//!
//! These tests drive the public API end-to-end: robots.txt and config files on
//! disk, shared directives across threads and the tokio worker pool.

use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::time::Duration;
use sumi_politeness::config::load_config;
use sumi_politeness::crawler::{build_directives, plan_fetches, resolve_paths, run_plan, Verdict};
use sumi_politeness::output::summarize;
use sumi_politeness::robots::parse_directives_with_clock;
use sumi_politeness::{HostDirectives, ManualClock};

fn write_file(dir: &Path, name: &str, content: &str) {
    let mut file = std::fs::File::create(dir.join(name)).unwrap();
    file.write_all(content.as_bytes()).unwrap();
}

const ROBOTS: &str = "\
# Example robots.txt
User-agent: *
Disallow: /private
Allow: /private/press
Crawl-delay: 5

User-agent: greedy-bot
Disallow: /
";

#[test]
fn test_concurrent_workers_receive_spaced_slots() {
    let clock = Arc::new(ManualClock::default());
    let directives = Arc::new(parse_directives_with_clock(ROBOTS, "sumi-bot", clock));
    let barrier = Barrier::new(4);

    let mut delays: Vec<Duration> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let directives = &directives;
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    directives
                        .allowed_in(&format!("/page/{}", i))
                        .expect("page should be allowed")
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    delays.sort();

    assert_eq!(
        delays,
        vec![
            Duration::from_millis(0),
            Duration::from_millis(5000),
            Duration::from_millis(10000),
            Duration::from_millis(15000),
        ]
    );
}

#[test]
fn test_allow_overrides_matching_disallow() {
    let clock = Arc::new(ManualClock::default());
    let directives = parse_directives_with_clock(ROBOTS, "sumi-bot", clock);

    assert!(directives.allowed_in("/private/accounts").is_none());
    assert!(directives.allowed_in("/private/press/2024").is_some());
}

#[test]
fn test_agent_specific_group() {
    let clock = Arc::new(ManualClock::default());
    let directives = parse_directives_with_clock(ROBOTS, "greedy-bot/3.0", clock);

    assert!(directives.allowed_in("/").is_none());
    assert_eq!(directives.crawl_delay(), None);
}

#[test]
fn test_directives_go_stale_after_a_day() {
    let clock = Arc::new(ManualClock::default());
    let directives = HostDirectives::with_clock(clock.clone());

    clock.advance(chrono::Duration::hours(12));
    directives.allowed_in("/");
    assert!(!directives.needs_refetch());
    assert_eq!(
        directives.last_access_time(),
        directives.time_fetched() + chrono::Duration::hours(12)
    );

    clock.advance(chrono::Duration::hours(13));
    assert!(directives.needs_refetch());
}

#[tokio::test]
async fn test_full_plan_from_config() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "robots.txt", ROBOTS);
    write_file(
        dir.path(),
        "politeness.toml",
        r#"
[crawler]
user-agent = "sumi-bot"
workers = 3

[robots]
path = "robots.txt"
crawl-delay-ms = 200

[site]
base-url = "https://example.com"
paths = [
    "/",
    "/about",
    "https://example.com/private/accounts",
    "/private/press/release#top",
]
"#,
    );

    let config = load_config(&dir.path().join("politeness.toml")).unwrap();
    let directives = build_directives(&config, dir.path()).unwrap();
    assert_eq!(directives.crawl_delay(), Some(Duration::from_millis(200)));

    let decisions = run_plan(&config, dir.path()).await.unwrap();
    let summary = summarize(&decisions);
    assert_eq!(summary.allowed, 3);
    assert_eq!(summary.disallowed, 1);

    let last = decisions.last().unwrap();
    assert_eq!(last.path, "/private/accounts");
    assert_eq!(last.verdict, Verdict::Disallowed);
}

#[tokio::test]
async fn test_plan_reserves_one_slot_per_allowed_path() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "politeness.toml",
        r#"
[crawler]
user-agent = "sumi-bot"
workers = 3

[robots]
path = "robots.txt"
crawl-delay-ms = 200

[site]
base-url = "https://example.com"
paths = ["/", "/about", "/private/accounts", "/private/press/release"]
"#,
    );
    let config = load_config(&dir.path().join("politeness.toml")).unwrap();

    let clock = Arc::new(ManualClock::default());
    let mut directives = parse_directives_with_clock(ROBOTS, &config.crawler.user_agent, clock);
    if let Some(delay) = config.robots.crawl_delay_override() {
        directives.set_crawl_delay(delay);
    }

    let decisions = plan_fetches(
        Arc::new(directives),
        resolve_paths(&config).unwrap(),
        config.crawler.workers as usize,
        false,
    )
    .await
    .unwrap();

    let delays: Vec<Option<Duration>> = decisions.iter().map(|d| d.verdict.delay()).collect();
    assert_eq!(
        delays,
        vec![
            Some(Duration::ZERO),
            Some(Duration::from_millis(200)),
            Some(Duration::from_millis(400)),
            None,
        ]
    );
    assert_eq!(summarize(&decisions).max_delay, Duration::from_millis(400));
}
