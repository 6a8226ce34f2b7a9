//! Parallel walk execution.
//!
//! A walk call is split into one batch per worker. Batches run on a fixed
//! rayon pool owned by the [`Graph`](crate::Graph) handle and report back
//! over an MPSC channel; the calling thread is the single consumer and sums
//! the partial histograms as they arrive.
//!
//! ```text
//! caller ──spawn×W──▶ pool ──(task, partial)──▶ channel ──▶ caller merges
//! ```
//!
//! Every batch is wrapped in `catch_unwind`, so a panicking batch still
//! reports (as a failure) and the caller never waits on a result that will
//! not come. On failure, timeout or cancellation the shared stop flag is
//! raised and the caller keeps draining until all W batches have reported.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::model::VisitHistogram;
use crate::{Error, Result};

/// How often a waiting caller re-checks its deadline and cancel token.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

// ============================================================================
// CancelToken
// ============================================================================

/// Caller-side handle for aborting an in-flight walk call.
///
/// Cloning shares the flag. Once cancelled, a token stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

// ============================================================================
// Per-task randomness
// ============================================================================

/// Generator for batch `task` of a call seeded with `seed`.
///
/// Every task draws from its own ChaCha stream, so no generator state is
/// shared between workers and equal `(seed, task)` pairs replay exactly.
pub fn task_rng(seed: u64, task: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(task as u64);
    rng
}

// ============================================================================
// WalkPool
// ============================================================================

type TaskOutcome = (usize, std::result::Result<VisitHistogram, String>);

/// Fixed-size worker pool that fans walk batches out and sums them back.
pub struct WalkPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl WalkPool {
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(Error::InvalidConfig("workers must be at least 1".into()));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("rwgraph-walk-{i}"))
            .build()
            .map_err(|e| Error::PoolError(e.to_string()))?;
        debug!(workers, "Started walk pool");
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Walks each batch runs for a request of `num_walks`.
    ///
    /// Floor division with a minimum of one, so the executed total
    /// (`per_worker * workers`) can differ from the request.
    pub fn per_worker(&self, num_walks: usize) -> usize {
        (num_walks / self.workers).max(1)
    }

    /// Run `job(task, stop)` once for every `task` in `0..workers` and sum
    /// the results.
    ///
    /// Blocks until every batch has reported, including after a failure,
    /// a timeout or a cancellation.
    pub fn fan_out<F>(
        &self,
        job: F,
        timeout: Option<Duration>,
        cancel: &CancelToken,
    ) -> Result<VisitHistogram>
    where
        F: Fn(usize, &AtomicBool) -> VisitHistogram + Send + Sync + 'static,
    {
        let job = Arc::new(job);
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel::<TaskOutcome>();

        for task in 0..self.workers {
            let job = Arc::clone(&job);
            let stop = Arc::clone(&stop);
            let tx = tx.clone();
            self.pool.spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| (*job)(task, &*stop)))
                    .map_err(|payload| panic_message(&*payload));
                // The receiver outlives every send: the caller drains all tasks.
                let _ = tx.send((task, outcome));
            });
        }
        drop(tx);

        let started = Instant::now();
        let mut merged = VisitHistogram::new();
        let mut received = 0;
        let mut failures: Vec<(usize, String)> = Vec::new();
        let mut aborted: Option<Error> = None;

        while received < self.workers {
            if aborted.is_none() {
                if cancel.is_cancelled() {
                    warn!(pending = self.workers - received, "Walk cancelled, draining workers");
                    stop.store(true, Ordering::Relaxed);
                    aborted = Some(Error::Cancelled);
                } else if let Some(limit) = timeout {
                    if started.elapsed() >= limit {
                        warn!(?limit, pending = self.workers - received, "Walk timed out, draining workers");
                        stop.store(true, Ordering::Relaxed);
                        aborted = Some(Error::Timeout(limit));
                    }
                }
            }

            match rx.recv_timeout(POLL_INTERVAL) {
                Ok((task, Ok(partial))) => {
                    received += 1;
                    debug!(task, visited = partial.len(), "Merging partial histogram");
                    merged.merge(partial);
                }
                Ok((task, Err(message))) => {
                    received += 1;
                    warn!(task, %message, "Walk worker panicked");
                    stop.store(true, Ordering::Relaxed);
                    failures.push((task, message));
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(Error::PoolError(format!(
                        "{} of {} walk workers exited without reporting",
                        self.workers - received,
                        self.workers
                    )));
                }
            }
        }

        if let Some((task, message)) = failures.first() {
            return Err(Error::WorkerPanic {
                failed: failures.len(),
                total: self.workers,
                message: format!("task {task}: {message}"),
            });
        }
        if let Some(err) = aborted {
            return Err(err);
        }
        Ok(merged)
    }
}

impl std::fmt::Debug for WalkPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalkPool").field("workers", &self.workers).finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
