//! # Latest-Wins Scheduler
//!
//! Serializes asynchronous filter submissions so that only the most
//! recently issued one mutates shared state.
//!
//! ## Why Execution-Time Checking?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RAPID TYPING, SLOW UNITS                                               │
//! │                                                                         │
//! │  submit("c")   token 1   ──┐                                            │
//! │  submit("co")  token 2     │  latest = 3 by the time unit 1 runs       │
//! │  submit("col") token 3   ──┘                                            │
//! │                                                                         │
//! │  Worker (single consumer, FIFO):                                        │
//! │    unit 1: token 1 ≠ latest 3 → skipped                                 │
//! │    unit 2: token 2 ≠ latest 3 → skipped                                 │
//! │    unit 3: token 3 = latest 3 → body runs, mutates the filtered view   │
//! │                                                                         │
//! │  The check happens immediately BEFORE each body runs, not at submit    │
//! │  time: a unit that was current when queued may be stale by the time    │
//! │  its turn arrives. No two bodies ever interleave - the worker awaits   │
//! │  each one to completion. A stalled body delays the chain; newer        │
//! │  submissions are still dropped correctly once their turn arrives.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A body that returns an error is logged and the chain proceeds; token
//! bookkeeping is untouched by failures.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::TerminalError;

// =============================================================================
// Token
// =============================================================================

/// Identifies one submitted unit. Monotonically increasing; only the most
/// recently issued token is "current".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(u64);

impl Token {
    pub fn value(&self) -> u64 {
        self.0
    }
}

// =============================================================================
// Scheduler
// =============================================================================

type UnitBody = Pin<Box<dyn Future<Output = Result<(), TerminalError>> + Send>>;

struct Unit {
    token: u64,
    body: UnitBody,
}

/// Single-consumer task queue with a latest-token guard.
pub struct FilterScheduler {
    tx: mpsc::UnboundedSender<Unit>,
    /// Highest token handed out so far; updated synchronously at submit.
    latest: Arc<AtomicU64>,
    next: Arc<AtomicU64>,
    /// Units submitted but not yet executed or skipped.
    pending: Arc<AtomicU64>,
    drained: Arc<Notify>,
    worker: JoinHandle<()>,
}

impl FilterScheduler {
    /// Spawns the consumer task on the current tokio runtime.
    pub fn spawn() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Unit>();
        let latest = Arc::new(AtomicU64::new(0));
        let next = Arc::new(AtomicU64::new(0));
        let pending = Arc::new(AtomicU64::new(0));
        let drained = Arc::new(Notify::new());

        let worker_latest = latest.clone();
        let worker_pending = pending.clone();
        let worker_drained = drained.clone();
        let worker = tokio::spawn(async move {
            while let Some(unit) = rx.recv().await {
                // Compare-and-act immediately before the body, never earlier.
                if unit.token == worker_latest.load(Ordering::SeqCst) {
                    if let Err(err) = unit.body.await {
                        warn!(token = unit.token, %err, "scheduled unit failed, chain continues");
                    }
                } else {
                    debug!(token = unit.token, "superseded unit skipped");
                }
                worker_pending.fetch_sub(1, Ordering::SeqCst);
                worker_drained.notify_waiters();
            }
        });

        FilterScheduler {
            tx,
            latest,
            next,
            pending,
            drained,
            worker,
        }
    }

    /// Queues a unit and marks its token as the latest.
    ///
    /// Submission order equals execution order (FIFO); applied-mutation
    /// order collapses to at most the single most recent submission.
    pub fn submit<F>(&self, body: F) -> Token
    where
        F: Future<Output = Result<(), TerminalError>> + Send + 'static,
    {
        let token = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest.store(token, Ordering::SeqCst);
        self.pending.fetch_add(1, Ordering::SeqCst);

        let unit = Unit {
            token,
            body: Box::pin(body),
        };
        if self.tx.send(unit).is_err() {
            // Worker is gone (shutdown); the submission is dropped.
            self.pending.fetch_sub(1, Ordering::SeqCst);
            warn!(token, "scheduler worker not running, unit dropped");
        }
        Token(token)
    }

    /// The most recently issued token.
    pub fn latest(&self) -> Token {
        Token(self.latest.load(Ordering::SeqCst))
    }

    /// Resolves once every queued unit has executed or been skipped.
    pub async fn idle(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            // register as a waiter BEFORE re-checking, or a notify between
            // the check and the await would be lost
            notified.as_mut().enable();
            if self.pending.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Closes the queue and waits for the worker to finish the backlog.
    pub async fn shutdown(self) {
        let FilterScheduler { tx, worker, .. } = self;
        drop(tx);
        let _ = worker.await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_single_submission_applies() {
        let scheduler = FilterScheduler::spawn();
        let applied: Arc<Mutex<Vec<u64>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = applied.clone();
        scheduler.submit(async move {
            sink.lock().unwrap().push(1);
            Ok(())
        });

        scheduler.idle().await;
        assert_eq!(*applied.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_latest_wins_under_burst() {
        let scheduler = FilterScheduler::spawn();
        let applied: Arc<Mutex<Vec<u64>>> = Arc::new(Mutex::new(Vec::new()));

        // A blocker unit stalls the chain while newer units are queued.
        let (started_tx, started_rx) = oneshot::channel::<()>();
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let sink = applied.clone();
        scheduler.submit(async move {
            started_tx.send(()).ok();
            release_rx.await.ok();
            sink.lock().unwrap().push(0);
            Ok(())
        });
        started_rx.await.unwrap();

        // Three more submissions while unit 0 is mid-body. Only the last
        // may apply its mutation, regardless of how slow the chain is.
        for n in 1..=3u64 {
            let sink = applied.clone();
            scheduler.submit(async move {
                sink.lock().unwrap().push(n);
                Ok(())
            });
        }
        release_tx.send(()).unwrap();

        scheduler.idle().await;
        // the blocker was current when its body started; of the burst only
        // the newest (3) survives the execution-time token check
        assert_eq!(*applied.lock().unwrap(), vec![0, 3]);
    }

    #[tokio::test]
    async fn test_stale_before_execution_is_skipped() {
        let scheduler = FilterScheduler::spawn();
        let applied: Arc<Mutex<Vec<u64>>> = Arc::new(Mutex::new(Vec::new()));

        let (started_tx, started_rx) = oneshot::channel::<()>();
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let sink = applied.clone();
        scheduler.submit(async move {
            started_tx.send(()).ok();
            release_rx.await.ok();
            sink.lock().unwrap().push(0);
            Ok(())
        });
        started_rx.await.unwrap();

        let sink = applied.clone();
        let stale = scheduler.submit(async move {
            sink.lock().unwrap().push(1);
            Ok(())
        });
        let sink = applied.clone();
        let fresh = scheduler.submit(async move {
            sink.lock().unwrap().push(2);
            Ok(())
        });
        assert!(stale < fresh);
        assert_eq!(scheduler.latest(), fresh);

        release_tx.send(()).unwrap();
        scheduler.idle().await;
        assert_eq!(*applied.lock().unwrap(), vec![0, 2]);
    }

    #[tokio::test]
    async fn test_error_in_unit_keeps_chain_alive() {
        let scheduler = FilterScheduler::spawn();
        let applied: Arc<Mutex<Vec<u64>>> = Arc::new(Mutex::new(Vec::new()));

        let (started_tx, started_rx) = oneshot::channel::<()>();
        let (release_tx, release_rx) = oneshot::channel::<()>();
        scheduler.submit(async move {
            started_tx.send(()).ok();
            release_rx.await.ok();
            Err(TerminalError::NoBusinesses)
        });
        started_rx.await.unwrap();

        let sink = applied.clone();
        scheduler.submit(async move {
            sink.lock().unwrap().push(7);
            Ok(())
        });
        release_tx.send(()).unwrap();

        scheduler.idle().await;
        // the failing unit is logged and dropped; the next one still runs
        assert_eq!(*applied.lock().unwrap(), vec![7]);

        scheduler.shutdown().await;
    }
}
