//! Sumi-Politeness main entry point
//!
//! This is the command-line interface for planning polite fetches against a host.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use sumi_politeness::config::{load_config_with_hash, Config};
use sumi_politeness::crawler::{build_directives, run_plan};
use sumi_politeness::output::{print_directives, print_plan};
use sumi_politeness::url::{parse_base_url, request_path};
use tracing_subscriber::EnvFilter;

/// Sumi-Politeness: per-host crawl courtesy
///
/// Evaluates a host's robots.txt rules and plans fetches so that the host's
/// crawl delay is respected across all workers.
#[derive(Parser, Debug)]
#[command(name = "sumi-politeness")]
#[command(version = "1.0.0")]
#[command(about = "Plan polite fetches against a host", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the loaded directives without planning
    #[arg(long, conflicts_with = "check")]
    dry_run: bool,

    /// Check the given URLs or paths once each instead of running the plan
    #[arg(long, value_name = "PATH", num_args = 1..)]
    check: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    let config_dir = cli
        .config
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    if cli.dry_run {
        handle_dry_run(&config, &config_dir)
    } else if !cli.check.is_empty() {
        handle_check(&config, &config_dir, &cli.check)
    } else {
        handle_plan(&config, &config_dir).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_politeness=info,warn"),
            1 => EnvFilter::new("sumi_politeness=debug,info"),
            2 => EnvFilter::new("sumi_politeness=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the config and loaded directives
fn handle_dry_run(config: &Config, config_dir: &Path) -> anyhow::Result<()> {
    println!("=== Sumi-Politeness Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  User agent: {}", config.crawler.user_agent);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Wait for delay: {}", config.crawler.wait_for_delay);

    println!("\nRobots:");
    println!(
        "  File: {}",
        config.robots.resolve_path(config_dir).display()
    );
    if let Some(ms) = config.robots.crawl_delay_ms {
        println!("  Crawl delay override: {}ms", ms);
    }

    println!("\nSite: {}", config.site.base_url);
    println!("  Paths ({}):", config.site.paths.len());
    for path in &config.site.paths {
        println!("    * {}", path);
    }
    println!();

    let directives = build_directives(config, config_dir)?;
    print_directives(&directives);

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the --check mode: evaluates each path once
fn handle_check(config: &Config, config_dir: &Path, targets: &[String]) -> anyhow::Result<()> {
    let directives = build_directives(config, config_dir)?;
    let base = parse_base_url(&config.site.base_url)?;

    for target in targets {
        let path = request_path(&base, target)?;
        match directives.allowed_in(&path) {
            Some(delay) => println!("allowed     +{}ms  {}", delay.as_millis(), path),
            None => println!("disallowed          {}", path),
        }
    }

    Ok(())
}

/// Handles the main mode: runs the pacing plan for the configured paths
async fn handle_plan(config: &Config, config_dir: &Path) -> anyhow::Result<()> {
    tracing::info!(
        "Planning {} paths on {} with {} workers",
        config.site.paths.len(),
        config.site.base_url,
        config.crawler.workers
    );

    match run_plan(config, config_dir).await {
        Ok(decisions) => {
            print_plan(&decisions);
            tracing::info!("Plan completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Plan failed: {}", e);
            Err(e.into())
        }
    }
}
