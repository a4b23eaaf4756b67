//! Per-host robots directives and crawl pacing
//!
//! A `HostDirectives` is built once from a host's robots.txt (allow rules,
//! disallow rules and an optional crawl delay) and then shared by every worker
//! crawling that host. Besides answering "may this path be fetched?", it hands
//! out fetch slots spaced by the crawl delay, so concurrent workers queue up
//! behind each other instead of hitting the host at the same moment.

use crate::robots::clock::{Clock, SystemClock};
use crate::robots::rules::RuleSet;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Directives older than this must be fetched again
const REFETCH_TTL_HOURS: i64 = 24;

/// Robots directives and pacing state for a single host
///
/// # Lifecycle
///
/// 1. Build phase: the parser calls [`add_allow`](Self::add_allow),
///    [`add_disallow`](Self::add_disallow) and
///    [`set_crawl_delay`](Self::set_crawl_delay). These take `&mut self`.
/// 2. Operational phase: the instance is wrapped in an `Arc` and shared by the
///    crawl workers, which only call the `&self` methods.
/// 3. Once [`needs_refetch`](Self::needs_refetch) reports true, the owning
///    cache replaces the instance with a freshly fetched one.
#[derive(Debug)]
pub struct HostDirectives {
    disallow: RuleSet,
    allow: RuleSet,

    /// `None` means the host did not ask for pacing
    crawl_delay: Option<Duration>,

    /// Earliest time at which the next fetch is on schedule
    next_allowed_crawl: Mutex<DateTime<Utc>>,

    time_fetched: DateTime<Utc>,
    time_last_accessed: Mutex<DateTime<Utc>>,

    clock: Arc<dyn Clock>,
}

impl HostDirectives {
    /// Creates empty directives stamped with the current wall-clock time
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates empty directives that read time from `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        Self {
            disallow: RuleSet::new(),
            allow: RuleSet::new(),
            crawl_delay: None,
            next_allowed_crawl: Mutex::new(now),
            time_fetched: now,
            time_last_accessed: Mutex::new(now),
            clock,
        }
    }

    /// Adds a `Disallow` prefix
    pub fn add_disallow(&mut self, path: impl Into<String>) {
        let path = path.into();
        tracing::debug!("Adding disallow rule: {:?}", path);
        self.disallow.add(path);
    }

    /// Adds an `Allow` prefix
    pub fn add_allow(&mut self, path: impl Into<String>) {
        let path = path.into();
        tracing::debug!("Adding allow rule: {:?}", path);
        self.allow.add(path);
    }

    /// Records the minimum spacing between two fetches to this host
    ///
    /// A zero delay is distinct from no delay at all: it still goes through
    /// the slot reservation in
    /// [`delay_until_next_allowed_crawl`](Self::delay_until_next_allowed_crawl).
    pub fn set_crawl_delay(&mut self, delay: Duration) {
        tracing::debug!("Setting crawl delay: {:?}", delay);
        self.crawl_delay = Some(delay);
    }

    /// Returns the configured crawl delay, if any
    pub fn crawl_delay(&self) -> Option<Duration> {
        self.crawl_delay
    }

    /// Returns the `Allow` rules
    pub fn allow_rules(&self) -> &RuleSet {
        &self.allow
    }

    /// Returns the `Disallow` rules
    pub fn disallow_rules(&self) -> &RuleSet {
        &self.disallow
    }

    /// Returns when these directives were created
    pub fn time_fetched(&self) -> DateTime<Utc> {
        self.time_fetched
    }

    /// Checks if the directives are older than 24 hours
    ///
    /// The TTL is fixed. Reacting to staleness is up to the owner of the
    /// instance.
    pub fn needs_refetch(&self) -> bool {
        let age = self.clock.now() - self.time_fetched;
        age > chrono::Duration::hours(REFETCH_TTL_HOURS)
    }

    /// Returns the time of the most recent [`allowed_in`](Self::allowed_in)
    /// call, or the creation time if there has been none
    pub fn last_access_time(&self) -> DateTime<Utc> {
        *self
            .time_last_accessed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the current throttle cursor without reserving a slot
    pub fn next_allowed_crawl(&self) -> DateTime<Utc> {
        *self
            .next_allowed_crawl
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Checks whether `path` may be fetched
    ///
    /// A path is permitted when no disallow rule matches it, or when any allow
    /// rule matches it. A matching allow rule always wins, regardless of how
    /// specific a matching disallow rule is.
    ///
    /// For a permitted path this reserves a fetch slot (see
    /// [`delay_until_next_allowed_crawl`](Self::delay_until_next_allowed_crawl))
    /// and returns the suggested wait before fetching. Call it at most once
    /// per fetch actually intended.
    ///
    /// # Returns
    ///
    /// * `Some(delay)` - The path is allowed after waiting `delay`
    /// * `None` - The path is never allowed
    pub fn allowed_in(&self, path: &str) -> Option<Duration> {
        let now = self.clock.now();
        *self
            .time_last_accessed
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = now;

        if !self.disallow.contains_prefix_of(path) || self.allow.contains_prefix_of(path) {
            let delay = self.delay_until_next_allowed_crawl();
            tracing::trace!("Path {} allowed after {:?}", path, delay);
            Some(delay)
        } else {
            tracing::trace!("Path {} disallowed", path);
            None
        }
    }

    /// Reserves the next fetch slot and returns how long to wait for it
    ///
    /// Every call advances the internal cursor whether or not the caller
    /// follows through with the fetch. For a fresh instance with a 5 second
    /// delay, four simultaneous calls return 0s, 5s, 10s and 15s.
    ///
    /// Without a crawl delay this always returns zero and never locks.
    pub fn delay_until_next_allowed_crawl(&self) -> Duration {
        let Some(crawl_delay) = self.crawl_delay else {
            return Duration::ZERO;
        };
        let step = chrono::Duration::from_std(crawl_delay).unwrap_or(chrono::Duration::MAX);

        let mut next = self
            .next_allowed_crawl
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let now = self.clock.now();

        if now < *next {
            let delay = (*next - now).to_std().unwrap_or(Duration::ZERO);
            *next = advance(*next, step);
            tracing::debug!("Reserved crawl slot in {:?}", delay);
            delay
        } else {
            *next = advance(now, step);
            Duration::ZERO
        }
    }
}

impl Default for HostDirectives {
    fn default() -> Self {
        Self::new()
    }
}

fn advance(from: DateTime<Utc>, step: chrono::Duration) -> DateTime<Utc> {
    from.checked_add_signed(step).unwrap_or(DateTime::<Utc>::MAX_UTC)
}
