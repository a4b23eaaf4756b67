//! Output module for Sumi-Politeness
//!
//! Summaries and console rendering of pacing plans and loaded directives.

mod stats;

pub use stats::{print_directives, print_plan, summarize, PlanSummary};
