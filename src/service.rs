//! The public face of the job lifecycle: submit, poll, fetch.
//!
//! [`JobService`] validates a request, creates the `Pending` record, hands the
//! work to the [`JobExecutor`], and answers status and result queries straight
//! from the [`JobStore`]. Queries never wait on executor progress.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use casegen::{Artifact, CaseStudy, JobError, JobService, JobState, Worker};
//! use casegen::store::InMemoryJobStore;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Worker for Echo {
//!     async fn run(&self, request: &str) -> Result<Artifact, JobError> {
//!         let document = CaseStudy { title: request.to_string(), ..CaseStudy::default() };
//!         Ok(Artifact::new("/tmp/echo.pdf", document))
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let service = JobService::new(Arc::new(InMemoryJobStore::new()), Arc::new(Echo));
//!
//! assert!(matches!(service.submit("hi").await, Err(JobError::Validation { .. })));
//!
//! let id = service.submit("Acme Corp wants to reduce logistics cost").await.unwrap();
//! while service.status(&id).await == JobState::Pending {
//!     tokio::task::yield_now().await;
//! }
//! let artifact = service.result(&id).await.unwrap();
//! assert_eq!(artifact.title(), "Acme Corp wants to reduce logistics cost");
//! # });
//! ```

use std::sync::Arc;

use crate::constants::{DEFAULT_POLL_INTERVAL_MS, MIN_REQUEST_LEN};
use crate::domain::{Artifact, JobId};
use crate::error::JobError;
use crate::executor::{ExecutorConfig, JobExecutor};
use crate::store::JobStore;
use crate::types::job::{JobState, JobStatus, StatusReport};
use crate::worker::Worker;

/// Service-level settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Requests with fewer characters (after trimming) are rejected.
    pub min_request_len: usize,

    /// Poll interval suggested in [`StatusReport`]s for pending jobs.
    pub poll_interval_ms: u64,

    /// Admission and timeout policy for background execution.
    pub executor: ExecutorConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            min_request_len: MIN_REQUEST_LEN,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            executor: ExecutorConfig::default(),
        }
    }
}

/// Submits jobs and answers queries about them.
#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn JobStore>,
    executor: JobExecutor,
    worker: Arc<dyn Worker>,
    config: ServiceConfig,
}

impl JobService {
    /// Creates a service with the default [`ServiceConfig`].
    pub fn new(store: Arc<dyn JobStore>, worker: Arc<dyn Worker>) -> Self {
        Self::with_config(store, worker, ServiceConfig::default())
    }

    /// Creates a service with explicit settings.
    pub fn with_config(
        store: Arc<dyn JobStore>,
        worker: Arc<dyn Worker>,
        config: ServiceConfig,
    ) -> Self {
        let executor = JobExecutor::new(Arc::clone(&store), config.executor.clone());
        Self {
            store,
            executor,
            worker,
            config,
        }
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<dyn JobStore> {
        &self.store
    }

    /// The active settings.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Stops starting new work. See [`JobExecutor::close`].
    ///
    /// Queries keep answering from the store after this.
    pub fn close(&self) {
        self.executor.close();
    }

    /// Checks a request without creating a job.
    pub fn validate(&self, request: &str) -> Result<(), JobError> {
        let len = request.trim().chars().count();
        if len < self.config.min_request_len {
            return Err(JobError::Validation {
                reason: format!(
                    "request must be at least {} characters, got {len}",
                    self.config.min_request_len
                ),
            });
        }
        Ok(())
    }

    /// Validates `request`, creates a `Pending` job, and starts it in the
    /// background.
    ///
    /// Returns as soon as the job exists; the job is `Pending` when this
    /// returns. On a validation error no job is created.
    pub async fn submit(&self, request: &str) -> Result<JobId, JobError> {
        self.validate(request)?;

        let job_id = self.store.create().await?;
        tracing::info!(job_id = %job_id, "job submitted");

        // The handle is dropped; the task keeps running detached.
        drop(self.executor.dispatch(
            job_id.clone(),
            request.trim().to_string(),
            Arc::clone(&self.worker),
        ));
        Ok(job_id)
    }

    /// Current state of `job_id`; `Unknown` if it was never created.
    pub async fn status(&self, job_id: &str) -> JobState {
        match self.store.get(job_id).await {
            Some(record) => record.status.into(),
            None => JobState::Unknown,
        }
    }

    /// The artifact of a completed job.
    ///
    /// # Errors
    ///
    /// - [`JobError::NotFound`] if the ID is unknown.
    /// - [`JobError::StillPending`] if the job has not finished.
    /// - [`JobError::JobFailed`] with the stored message if it failed.
    pub async fn result(&self, job_id: &str) -> Result<Artifact, JobError> {
        let Some(record) = self.store.get(job_id).await else {
            tracing::debug!(job_id, "result requested for unknown job");
            return Err(JobError::NotFound {
                job_id: job_id.to_string(),
            });
        };

        match (record.status, record.result, record.error) {
            (JobStatus::Complete, Some(artifact), _) => Ok(artifact),
            (JobStatus::Failed, _, Some(message)) => Err(JobError::JobFailed {
                job_id: record.id,
                message,
            }),
            (JobStatus::Pending, ..) => Err(JobError::StillPending { job_id: record.id }),
            (status, ..) => {
                tracing::error!(job_id, %status, "terminal record is missing its outcome");
                Err(JobError::JobFailed {
                    job_id: record.id,
                    message: "job record is inconsistent".to_string(),
                })
            }
        }
    }

    /// Serializable status view for polling clients.
    pub async fn status_report(&self, job_id: &str) -> StatusReport {
        let mut report = StatusReport {
            id: job_id.to_string(),
            status: JobState::Unknown,
            title: None,
            error: None,
            poll_interval_ms: None,
        };
        if let Some(record) = self.store.get(job_id).await {
            report.status = record.status.into();
            match record.status {
                JobStatus::Pending => report.poll_interval_ms = Some(self.config.poll_interval_ms),
                JobStatus::Complete => {
                    report.title = record.result.map(|artifact| artifact.document.title)
                }
                JobStatus::Failed => report.error = record.error,
            }
        }
        report
    }
}

impl std::fmt::Debug for JobService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobService")
            .field("executor", &self.executor)
            .field("config", &self.config)
            .field("jobs", &self.store.len())
            .finish_non_exhaustive()
    }
}
