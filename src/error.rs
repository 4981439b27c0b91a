//! Error types for job submission, execution, and queries.
//!
//! [`JobError`] covers the whole lifecycle: requests rejected before a job
//! exists, failures captured from the collaborators while a job runs, and the
//! query-time outcomes callers use to decide whether to keep polling.

use thiserror::Error;

use crate::types::job::JobStatus;

/// Errors that can occur while submitting, running, or querying a job.
///
/// Query-time variants are designed to be told apart by callers:
///
/// - [`StillPending`](JobError::StillPending) means "try again later".
/// - [`JobFailed`](JobError::JobFailed) means "this will never succeed".
/// - [`NotFound`](JobError::NotFound) means "no such job" (never created, or
///   the process restarted since).
///
/// # Examples
///
/// ```
/// use casegen::JobError;
///
/// let err = JobError::StillPending {
///     job_id: "abc".to_string(),
/// };
/// assert!(err.is_retryable());
/// assert_eq!(err.to_string(), "job still pending: abc");
/// ```
#[derive(Debug, Error)]
pub enum JobError {
    /// The request was rejected before a job was created.
    #[error("invalid request: {reason}")]
    Validation {
        /// Why the request was rejected.
        reason: String,
    },

    /// The content generator failed or returned output that could not be parsed.
    #[error("content generation failed: {message}")]
    Generation {
        /// Description of the failure.
        message: String,
    },

    /// The renderer failed to turn the document into a file.
    #[error("rendering failed: {message}")]
    Render {
        /// Description of the failure.
        message: String,
    },

    /// No job with the given ID exists.
    #[error("job not found: {job_id}")]
    NotFound {
        /// The ID that was looked up.
        job_id: String,
    },

    /// The job exists but has not reached a terminal state.
    #[error("job still pending: {job_id}")]
    StillPending {
        /// The pending job.
        job_id: String,
    },

    /// The job reached the `Failed` state.
    #[error("job {job_id} failed: {message}")]
    JobFailed {
        /// The failed job.
        job_id: String,
        /// The failure description stored on the job.
        message: String,
    },

    /// A state transition was rejected (e.g. completing a job twice).
    #[error("invalid transition from {from} to {to} for job {job_id}")]
    InvalidTransition {
        /// The job that was being transitioned.
        job_id: String,
        /// Its current status.
        from: JobStatus,
        /// The rejected target status.
        to: JobStatus,
    },

    /// Configuration could not be resolved.
    #[error("configuration error: {0}")]
    Config(String),
}

impl JobError {
    /// Creates a [`JobError::Generation`] from any displayable message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Creates a [`JobError::Render`] from any displayable message.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Returns `true` when the same query may succeed later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StillPending { .. })
    }

    /// The description stored on a job when this error ends it.
    ///
    /// Collaborator failures keep their own wording (e.g. `"rate limited"`)
    /// so callers see exactly what the generator or renderer reported.
    /// Every other variant uses its `Display` text.
    ///
    /// # Examples
    ///
    /// ```
    /// use casegen::JobError;
    ///
    /// assert_eq!(JobError::generation("rate limited").failure_message(), "rate limited");
    /// assert_eq!(
    ///     JobError::Config("no key".to_string()).failure_message(),
    ///     "configuration error: no key"
    /// );
    /// ```
    pub fn failure_message(&self) -> String {
        match self {
            Self::Generation { message } | Self::Render { message } => message.clone(),
            other => other.to_string(),
        }
    }
}
