//! Worker pool that plans fetches against a shared host
//!
//! Every worker pulls paths from a shared queue and asks the host's
//! `HostDirectives` for a verdict. Since all workers share one instance, the
//! crawl delay is turned into a queue of reservations: the k-th fetch that is
//! allowed lands roughly `k * delay` after the first one.

use crate::robots::HostDirectives;
use crate::Result;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Outcome of checking one path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The path may be fetched after waiting `delay`
    Allowed { delay: Duration },

    /// The host's robots rules never allow this path
    Disallowed,
}

impl Verdict {
    /// Returns the suggested delay for an allowed path
    pub fn delay(&self) -> Option<Duration> {
        match self {
            Self::Allowed { delay } => Some(*delay),
            Self::Disallowed => None,
        }
    }
}

/// A planned fetch and the worker that made the reservation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchDecision {
    /// The request path that was checked
    pub path: String,

    /// Index of the worker that checked it
    pub worker: usize,

    pub verdict: Verdict,
}

/// Plans fetches for `paths` using `workers` concurrent tasks
///
/// Each path is checked exactly once, so each allowed path holds exactly one
/// reservation on the host's pacing cursor. If `wait` is set, a worker sleeps
/// for the suggested delay before taking its next path, as a real fetcher
/// would.
///
/// # Arguments
///
/// * `directives` - The shared directives for the host
/// * `paths` - Request paths to check
/// * `workers` - Number of concurrent workers (at least one is used)
/// * `wait` - Whether workers honor the suggested delays
///
/// # Returns
///
/// * `Ok(Vec<FetchDecision>)` - Allowed fetches ordered by delay, then disallowed paths
/// * `Err(PolitenessError::Worker)` - A worker task panicked
pub async fn plan_fetches(
    directives: Arc<HostDirectives>,
    paths: Vec<String>,
    workers: usize,
    wait: bool,
) -> Result<Vec<FetchDecision>> {
    let queue = Arc::new(Mutex::new(VecDeque::from(paths)));
    let workers = workers.max(1);

    tracing::info!(
        "Planning {} fetches with {} workers",
        queue.lock().unwrap_or_else(PoisonError::into_inner).len(),
        workers
    );

    let handles: Vec<_> = (0..workers)
        .map(|worker| {
            let directives = Arc::clone(&directives);
            let queue = Arc::clone(&queue);
            tokio::spawn(run_worker(worker, directives, queue, wait))
        })
        .collect();

    let mut decisions = Vec::new();
    for handle in handles {
        decisions.extend(handle.await?);
    }

    decisions.sort_by(|a, b| {
        let key = |d: &FetchDecision| (d.verdict.delay().is_none(), d.verdict.delay());
        key(a).cmp(&key(b)).then_with(|| a.path.cmp(&b.path))
    });

    Ok(decisions)
}

async fn run_worker(
    worker: usize,
    directives: Arc<HostDirectives>,
    queue: Arc<Mutex<VecDeque<String>>>,
    wait: bool,
) -> Vec<FetchDecision> {
    let mut decisions = Vec::new();

    loop {
        // Guard dropped before any await
        let next = queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        let Some(path) = next else {
            break;
        };

        let verdict = match directives.allowed_in(&path) {
            Some(delay) => Verdict::Allowed { delay },
            None => Verdict::Disallowed,
        };

        match verdict {
            Verdict::Allowed { delay } => {
                tracing::debug!("Worker {} scheduled {} in {:?}", worker, path, delay);
                if wait && !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
            Verdict::Disallowed => {
                tracing::info!("Worker {}: {} disallowed by robots.txt", worker, path);
            }
        }

        decisions.push(FetchDecision {
            path,
            worker,
            verdict,
        });
    }

    decisions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robots::ManualClock;
    use std::time::Instant;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|p| p.to_string()).collect()
    }

    fn frozen_directives(delay: Option<Duration>) -> HostDirectives {
        let mut directives = HostDirectives::with_clock(Arc::new(ManualClock::default()));
        if let Some(delay) = delay {
            directives.set_crawl_delay(delay);
        }
        directives
    }

    #[tokio::test]
    async fn test_plan_spaces_allowed_fetches() {
        let directives = Arc::new(frozen_directives(Some(Duration::from_secs(5))));

        let decisions = plan_fetches(directives, paths(&["/a", "/b", "/c", "/d"]), 4, false)
            .await
            .unwrap();

        let delays: Vec<Option<Duration>> =
            decisions.iter().map(|d| d.verdict.delay()).collect();
        assert_eq!(
            delays,
            vec![
                Some(Duration::ZERO),
                Some(Duration::from_secs(5)),
                Some(Duration::from_secs(10)),
                Some(Duration::from_secs(15)),
            ]
        );
    }

    #[tokio::test]
    async fn test_disallowed_paths_sorted_last_and_not_reserved() {
        let mut directives = frozen_directives(Some(Duration::from_secs(1)));
        directives.add_disallow("/private");
        let directives = Arc::new(directives);

        let decisions = plan_fetches(
            Arc::clone(&directives),
            paths(&["/private/a", "/public", "/private/b", "/about"]),
            2,
            false,
        )
        .await
        .unwrap();

        assert_eq!(decisions.len(), 4);
        assert_eq!(decisions[2].verdict, Verdict::Disallowed);
        assert_eq!(decisions[3].verdict, Verdict::Disallowed);
        assert_eq!(decisions[2].path, "/private/a");

        let allowed: Vec<Option<Duration>> =
            decisions[..2].iter().map(|d| d.verdict.delay()).collect();
        assert_eq!(
            allowed,
            vec![Some(Duration::ZERO), Some(Duration::from_secs(1))]
        );
    }

    #[tokio::test]
    async fn test_no_crawl_delay_plans_everything_now() {
        let directives = Arc::new(frozen_directives(None));

        let decisions = plan_fetches(directives, paths(&["/1", "/2", "/3"]), 3, true)
            .await
            .unwrap();

        assert!(decisions
            .iter()
            .all(|d| d.verdict == Verdict::Allowed { delay: Duration::ZERO }));
    }

    #[tokio::test]
    async fn test_zero_workers_still_plans() {
        let directives = Arc::new(frozen_directives(None));
        let decisions = plan_fetches(directives, paths(&["/only"]), 0, false)
            .await
            .unwrap();
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].worker, 0);
    }

    #[tokio::test]
    async fn test_empty_plan() {
        let directives = Arc::new(frozen_directives(Some(Duration::from_secs(5))));
        let decisions = plan_fetches(directives, Vec::new(), 4, false).await.unwrap();
        assert!(decisions.is_empty());
    }

    #[tokio::test]
    async fn test_waiting_worker_honors_delay() {
        let mut directives = HostDirectives::new();
        directives.set_crawl_delay(Duration::from_millis(30));
        let directives = Arc::new(directives);

        let started = Instant::now();
        let decisions = plan_fetches(directives, paths(&["/1", "/2", "/3"]), 1, true)
            .await
            .unwrap();

        assert_eq!(decisions.len(), 3);
        assert_eq!(decisions[0].verdict.delay(), Some(Duration::ZERO));
        // Second and third fetch each wait for their slot
        assert!(started.elapsed() >= Duration::from_millis(40));
    }
}
