//! Background work off the UI sequence.
//!
//! Jobs run on a small pool of worker threads. Their results are never
//! applied on the worker: they queue up until the UI sequence drains them
//! with [`BackgroundExecutor::drain`], which is the only point where
//! background work can touch canvas state.

use parking_lot::Mutex;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Run `work`, turning a panic into its message.
pub(crate) fn run_caught<R>(work: impl FnOnce() -> R) -> Result<R, String> {
    catch_unwind(AssertUnwindSafe(work)).map_err(|panic| {
        panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "background job panicked".to_string())
    })
}

/// A finished job as seen from the UI sequence.
#[derive(Debug)]
pub struct TaskOutcome<R> {
    pub label: String,
    /// `Err` carries the panic message when the job panicked
    pub result: Result<R, String>,
}

pub struct BackgroundExecutor<R: Send + 'static> {
    jobs: Option<Sender<Job>>,
    results_tx: Sender<TaskOutcome<R>>,
    results_rx: Receiver<TaskOutcome<R>>,
    workers: Vec<JoinHandle<()>>,
    pending: usize,
}

impl<R: Send + 'static> BackgroundExecutor<R> {
    pub fn new(worker_count: usize) -> Self {
        let (jobs_tx, jobs_rx) = mpsc::channel::<Job>();
        let (results_tx, results_rx) = mpsc::channel();
        let jobs_rx = Arc::new(Mutex::new(jobs_rx));

        let mut workers = Vec::new();
        for index in 0..worker_count.max(1) {
            let jobs_rx = Arc::clone(&jobs_rx);
            let spawned = std::thread::Builder::new()
                .name(format!("glyphboard-bg-{index}"))
                .spawn(move || {
                    loop {
                        let job = jobs_rx.lock().recv();
                        match job {
                            Ok(job) => job(),
                            Err(_) => break,
                        }
                    }
                });
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => warn!("Failed to spawn background worker: {}", e),
            }
        }

        Self {
            jobs: Some(jobs_tx),
            results_tx,
            results_rx,
            workers,
            pending: 0,
        }
    }

    /// Queue `work` on the pool. Runs inline when no worker could be spawned.
    pub fn spawn<F>(&mut self, label: &str, work: F)
    where
        F: FnOnce() -> R + Send + 'static,
    {
        let label = label.to_string();
        let results_tx = self.results_tx.clone();
        let job: Job = Box::new(move || {
            let result = run_caught(work);
            let _ = results_tx.send(TaskOutcome { label, result });
        });

        self.pending += 1;
        let job = match (&self.jobs, self.workers.is_empty()) {
            (Some(jobs), false) => match jobs.send(job) {
                Ok(()) => return,
                Err(mpsc::SendError(job)) => job,
            },
            _ => job,
        };
        debug!("No background worker available, running job inline");
        job();
    }

    /// Collect every finished job without blocking.
    pub fn drain(&mut self) -> Vec<TaskOutcome<R>> {
        let outcomes: Vec<_> = self.results_rx.try_iter().collect();
        self.pending -= outcomes.len().min(self.pending);
        outcomes
    }

    /// Wait up to `timeout` for at least one job to finish, then collect
    /// everything that is ready.
    pub fn drain_timeout(&mut self, timeout: Duration) -> Vec<TaskOutcome<R>> {
        if self.pending == 0 {
            return Vec::new();
        }
        let deadline = Instant::now() + timeout;
        let mut outcomes = Vec::new();
        match self.results_rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(outcome) => outcomes.push(outcome),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return outcomes,
        }
        outcomes.extend(self.results_rx.try_iter());
        self.pending -= outcomes.len().min(self.pending);
        outcomes
    }

    /// Jobs spawned whose results have not been drained yet.
    pub fn pending_count(&self) -> usize {
        self.pending
    }

    pub fn has_pending(&self) -> bool {
        self.pending > 0
    }
}

impl<R: Send + 'static> Drop for BackgroundExecutor<R> {
    fn drop(&mut self) {
        // Closing the job channel lets idle workers exit.
        self.jobs.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
