//! Plan statistics and console output

use crate::crawler::{FetchDecision, Verdict};
use crate::robots::HostDirectives;
use std::time::Duration;

/// Summary of a pacing plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanSummary {
    /// Number of paths that may be fetched
    pub allowed: usize,

    /// Number of paths the robots rules never allow
    pub disallowed: usize,

    /// Delay of the last reserved slot
    pub max_delay: Duration,
}

impl PlanSummary {
    /// Total number of paths checked
    pub fn total(&self) -> usize {
        self.allowed + self.disallowed
    }
}

/// Computes a summary over a set of decisions
pub fn summarize(decisions: &[FetchDecision]) -> PlanSummary {
    decisions
        .iter()
        .fold(PlanSummary::default(), |mut summary, decision| {
            match decision.verdict {
                Verdict::Allowed { delay } => {
                    summary.allowed += 1;
                    summary.max_delay = summary.max_delay.max(delay);
                }
                Verdict::Disallowed => summary.disallowed += 1,
            }
            summary
        })
}

/// Prints a pacing plan to stdout in a formatted manner
pub fn print_plan(decisions: &[FetchDecision]) {
    println!("=== Fetch Plan ===\n");

    for decision in decisions {
        match decision.verdict {
            Verdict::Allowed { delay } => println!(
                "  [worker {}] +{:>8}ms  {}",
                decision.worker,
                delay.as_millis(),
                decision.path
            ),
            Verdict::Disallowed => println!(
                "  [worker {}] disallowed  {}",
                decision.worker, decision.path
            ),
        }
    }
    println!();

    let summary = summarize(decisions);
    println!(
        "Allowed: {} / {} paths, last slot in {}ms",
        summary.allowed,
        summary.total(),
        summary.max_delay.as_millis()
    );
    println!("Disallowed: {}", summary.disallowed);
}

/// Prints the loaded directives for a host
pub fn print_directives(directives: &HostDirectives) {
    println!("Directives:");
    println!("  Fetched at: {}", directives.time_fetched().to_rfc3339());
    match directives.crawl_delay() {
        Some(delay) => println!("  Crawl delay: {}ms", delay.as_millis()),
        None => println!("  Crawl delay: none"),
    }

    println!("  Allow ({}):", directives.allow_rules().len());
    for pattern in directives.allow_rules().patterns() {
        println!("    - {:?}", pattern);
    }

    println!("  Disallow ({}):", directives.disallow_rules().len());
    for pattern in directives.disallow_rules().patterns() {
        println!("    - {:?}", pattern);
    }
}
