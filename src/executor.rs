//! Background execution of jobs.
//!
//! [`JobExecutor::dispatch`] spawns one tokio task per job. The task runs the
//! worker once and writes the terminal outcome into the [`JobStore`]; the
//! caller gets control back immediately.
//!
//! # Admission
//!
//! By default every dispatch starts its worker right away, with no upper
//! bound on concurrent workers. Setting
//! [`ExecutorConfig::max_concurrent_jobs`] gates workers behind a semaphore;
//! jobs waiting for a permit stay `Pending`.
//!
//! # Failure capture
//!
//! Worker errors, worker panics, and an exceeded
//! [`ExecutorConfig::job_timeout`] all end the job as `Failed` with a
//! description. None of them propagate out of the spawned task.
//!
//! # Shutdown
//!
//! [`JobExecutor::close`] stops admitting queued jobs: any job still waiting
//! for a permit fails instead of starting. Workers already running finish
//! normally.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::domain::{Artifact, JobId};
use crate::error::JobError;
use crate::store::JobStore;
use crate::worker::Worker;

/// Execution policy.
///
/// # Defaults
///
/// | Setting               | Default | Description                          |
/// |-----------------------|---------|--------------------------------------|
/// | `max_concurrent_jobs` | `None`  | Unbounded concurrent workers         |
/// | `job_timeout`         | `None`  | Workers may run indefinitely         |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Upper bound on workers running at once. `None` means unbounded.
    pub max_concurrent_jobs: Option<usize>,

    /// Deadline for a single worker invocation. `None` means no deadline.
    pub job_timeout: Option<Duration>,
}

impl ExecutorConfig {
    /// Sets the concurrent worker limit.
    pub fn with_max_concurrent_jobs(mut self, limit: usize) -> Self {
        self.max_concurrent_jobs = Some(limit);
        self
    }

    /// Sets the per-job deadline.
    pub fn with_job_timeout(mut self, timeout: Duration) -> Self {
        self.job_timeout = Some(timeout);
        self
    }
}

/// Runs workers off the caller's path and records their outcomes.
#[derive(Clone)]
pub struct JobExecutor {
    store: Arc<dyn JobStore>,
    permits: Option<Arc<Semaphore>>,
    job_timeout: Option<Duration>,
    closed: Arc<AtomicBool>,
}

impl JobExecutor {
    /// Creates an executor that writes outcomes into `store`.
    ///
    /// A `max_concurrent_jobs` of zero is treated as one.
    pub fn new(store: Arc<dyn JobStore>, config: ExecutorConfig) -> Self {
        Self {
            store,
            permits: config
                .max_concurrent_jobs
                .map(|limit| Arc::new(Semaphore::new(limit.max(1)))),
            job_timeout: config.job_timeout,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Number of workers that may still start without waiting, if bounded.
    pub fn available_permits(&self) -> Option<usize> {
        self.permits.as_ref().map(|permits| permits.available_permits())
    }

    /// Stops admitting queued jobs.
    ///
    /// Jobs waiting for a permit, and jobs dispatched afterwards, end as
    /// `Failed` without running. Workers already running are not interrupted.
    /// Without a concurrency limit nothing ever queues, so only later
    /// dispatches are affected.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        if let Some(permits) = &self.permits {
            permits.close();
        }
        tracing::info!("executor closed to new jobs");
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Spawns the worker for `job_id` and returns without waiting for it.
    ///
    /// The returned handle resolves once the outcome has been written to the
    /// store. Dropping it detaches the task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(
        &self,
        job_id: JobId,
        request: String,
        worker: Arc<dyn Worker>,
    ) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let permits = self.permits.clone();
        let job_timeout = self.job_timeout;
        let closed = Arc::clone(&self.closed);
        let span = tracing::info_span!("job", job_id = %job_id);

        tracing::debug!(job_id = %job_id, "dispatching job");
        tokio::spawn(
            async move {
                // A closed semaphore means the executor was closed while the
                // job was queued.
                let admitted = match permits {
                    Some(permits) => permits.acquire_owned().await.map(Some).ok(),
                    None => Some(None),
                };
                let _permit = match admitted {
                    Some(permit) if !closed.load(Ordering::SeqCst) => permit,
                    _ => {
                        record_outcome(
                            store.as_ref(),
                            &job_id,
                            Err("executor shut down before the job started".to_string()),
                            Duration::ZERO,
                        )
                        .await;
                        return;
                    }
                };

                let started = Instant::now();
                let outcome = run_worker(worker.as_ref(), &request, job_timeout).await;
                record_outcome(store.as_ref(), &job_id, outcome, started.elapsed()).await;
            }
            .instrument(span),
        )
    }
}

impl std::fmt::Debug for JobExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobExecutor")
            .field("available_permits", &self.available_permits())
            .field("job_timeout", &self.job_timeout)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// Runs the worker once, folding errors, panics, and timeouts into a message.
async fn run_worker(
    worker: &dyn Worker,
    request: &str,
    job_timeout: Option<Duration>,
) -> Result<Artifact, String> {
    let run = AssertUnwindSafe(worker.run(request)).catch_unwind();
    let result = match job_timeout {
        Some(limit) => match tokio::time::timeout(limit, run).await {
            Ok(result) => result,
            Err(_) => return Err(format!("job timed out after {}ms", limit.as_millis())),
        },
        None => run.await,
    };

    match result {
        Ok(Ok(artifact)) => Ok(artifact),
        Ok(Err(err)) => Err(err.failure_message()),
        Err(panic) => Err(format!("worker panicked: {}", panic_message(panic.as_ref()))),
    }
}

async fn record_outcome(
    store: &dyn JobStore,
    job_id: &str,
    outcome: Result<Artifact, String>,
    elapsed: Duration,
) {
    let elapsed_ms = duration_ms(elapsed);
    let written = match outcome {
        Ok(artifact) => {
            tracing::info!(
                job_id,
                elapsed_ms,
                location = %artifact.location().display(),
                "job complete"
            );
            store.complete(job_id, artifact).await
        }
        Err(message) => {
            tracing::warn!(job_id, elapsed_ms, error = %message, "job failed");
            store.fail(job_id, message).await
        }
    };

    if let Err(err) = written {
        tracing::error!(job_id, error = %err, "could not record job outcome");
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub(crate) fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    }
}
