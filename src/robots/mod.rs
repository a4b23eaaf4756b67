//! Robots.txt handling module
//!
//! This module holds the per-host politeness core:
//!
//! - `RuleSet`: literal path-prefix rules
//! - `HostDirectives`: allow/disallow evaluation plus crawl-delay pacing
//! - `Clock`: the time source used for staleness and pacing
//!
//! and a small reader that builds `HostDirectives` from robots.txt text.

mod clock;
mod directives;
mod parser;
mod rules;

pub use clock::{Clock, ManualClock, SystemClock};
pub use directives::HostDirectives;
pub use parser::{load_directives, parse_directives, parse_directives_with_clock};
pub use rules::RuleSet;
