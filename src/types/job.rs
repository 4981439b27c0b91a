//! Job status types and the serializable views handed to pollers.
//!
//! [`JobStatus`] is the state stored on a record and drives the state
//! machine. [`JobState`] is what a status query answers: the stored status,
//! or `Unknown` when no record exists. [`StatusReport`] bundles a state with
//! the details an outer layer needs to render a polling page.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::JobError;

/// Lifecycle status of a stored job.
///
/// # State Machine
///
/// ```text
/// Pending -> Complete, Failed
/// Complete -> (terminal, no transitions)
/// Failed -> (terminal, no transitions)
/// ```
///
/// # Examples
///
/// ```
/// use casegen::JobStatus;
///
/// assert!(!JobStatus::Pending.is_terminal());
/// assert!(JobStatus::Pending.can_transition_to(&JobStatus::Complete));
/// assert!(!JobStatus::Complete.can_transition_to(&JobStatus::Failed));
/// assert!(!JobStatus::Failed.can_transition_to(&JobStatus::Pending));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// The worker has been dispatched and has not reported an outcome.
    Pending,
    /// The worker succeeded; the record carries an artifact (terminal).
    Complete,
    /// The worker failed; the record carries an error message (terminal).
    Failed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Complete => write!(f, "complete"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl JobStatus {
    /// Returns `true` for `Complete` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    /// Returns `true` if moving from this status to `next` is allowed.
    ///
    /// Only `Pending` may move, and only to a terminal status.
    pub fn can_transition_to(&self, next: &Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Complete) | (Self::Pending, Self::Failed)
        )
    }

    /// Validates a transition, returning [`JobError::InvalidTransition`]
    /// with the job's ID when it is not allowed.
    ///
    /// # Examples
    ///
    /// ```
    /// use casegen::{JobError, JobStatus};
    ///
    /// assert!(JobStatus::Pending
    ///     .validate_transition("job-1", &JobStatus::Failed)
    ///     .is_ok());
    ///
    /// let err = JobStatus::Complete
    ///     .validate_transition("job-1", &JobStatus::Complete)
    ///     .unwrap_err();
    /// assert!(matches!(err, JobError::InvalidTransition { .. }));
    /// ```
    pub fn validate_transition(&self, job_id: &str, next: &Self) -> Result<(), JobError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(JobError::InvalidTransition {
                job_id: job_id.to_string(),
                from: *self,
                to: *next,
            })
        }
    }
}

/// Answer to a status query.
///
/// Unlike [`JobStatus`], this includes `Unknown` for IDs the store has never
/// seen. `Unknown` is an ordinary outcome, not an error: the caller is told
/// the job was never created or the process restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// No job with this ID exists.
    Unknown,
    /// See [`JobStatus::Pending`].
    Pending,
    /// See [`JobStatus::Complete`].
    Complete,
    /// See [`JobStatus::Failed`].
    Failed,
}

impl JobState {
    /// Lowercase wire name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Pending => "pending",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }

    /// Returns `true` if no further change is expected for this ID.
    ///
    /// `Unknown` counts as settled: a job that does not exist never appears
    /// under an ID handed out earlier.
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<JobStatus> for JobState {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Pending => Self::Pending,
            JobStatus::Complete => Self::Complete,
            JobStatus::Failed => Self::Failed,
        }
    }
}

/// Serializable status view for a polling client.
///
/// `title` is filled once the job is complete and `error` once it has failed.
/// `poll_interval_ms` is only set while the job is still pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    /// The queried job ID.
    pub id: String,

    /// Current state.
    pub status: JobState,

    /// Title of the generated document, once complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Failure description, once failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Suggested delay before polling again.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_interval_ms: Option<u64>,
}
