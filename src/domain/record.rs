//! Job record -- the store's representation of one unit of work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::artifact::Artifact;
use crate::domain::id::{new_job_id, JobId};
use crate::error::JobError;
use crate::types::job::JobStatus;

/// A tracked unit of asynchronous work.
///
/// Records are created `Pending` and moved exactly once to `Complete` or
/// `Failed` through [`complete`](Self::complete) or [`fail`](Self::fail).
/// Both mutators validate the transition first and then set status, payload,
/// and timestamp together, so a record never carries a status without its
/// matching payload:
///
/// - `Pending`: `result` and `error` are both `None`.
/// - `Complete`: `result` is `Some`, `error` is `None`.
/// - `Failed`: `error` is `Some`, `result` is `None`.
///
/// Fields are public for readers; stores only mutate through the methods.
///
/// # Examples
///
/// ```
/// use casegen::domain::JobRecord;
/// use casegen::JobStatus;
///
/// let mut record = JobRecord::new();
/// assert_eq!(record.status, JobStatus::Pending);
///
/// record.fail("rate limited").unwrap();
/// assert_eq!(record.status, JobStatus::Failed);
/// assert_eq!(record.error.as_deref(), Some("rate limited"));
/// assert!(record.is_consistent());
///
/// // Terminal records reject further transitions.
/// assert!(record.fail("again").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Unique, immutable identifier.
    pub id: JobId,

    /// Current lifecycle status.
    pub status: JobStatus,

    /// The produced artifact, only when `Complete`.
    pub result: Option<Artifact>,

    /// Failure description, only when `Failed`.
    pub error: Option<String>,

    /// When the job was submitted.
    pub created_at: DateTime<Utc>,

    /// When the status last changed.
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    /// Creates a `Pending` record with a freshly minted ID.
    pub fn new() -> Self {
        Self::with_id(new_job_id())
    }

    /// Creates a `Pending` record under the given ID.
    pub fn with_id(id: impl Into<JobId>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            status: JobStatus::Pending,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the record to `Complete` with the given artifact.
    ///
    /// # Errors
    ///
    /// [`JobError::InvalidTransition`] if the record is not `Pending`; the
    /// record is left untouched.
    pub fn complete(&mut self, artifact: Artifact) -> Result<(), JobError> {
        self.status
            .validate_transition(&self.id, &JobStatus::Complete)?;
        self.status = JobStatus::Complete;
        self.result = Some(artifact);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Moves the record to `Failed` with the given description.
    ///
    /// # Errors
    ///
    /// [`JobError::InvalidTransition`] if the record is not `Pending`; the
    /// record is left untouched.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), JobError> {
        self.status
            .validate_transition(&self.id, &JobStatus::Failed)?;
        self.status = JobStatus::Failed;
        self.error = Some(message.into());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Returns `true` once the job has completed or failed.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns `true` if status and payload agree.
    pub fn is_consistent(&self) -> bool {
        match self.status {
            JobStatus::Pending => self.result.is_none() && self.error.is_none(),
            JobStatus::Complete => self.result.is_some() && self.error.is_none(),
            JobStatus::Failed => self.result.is_none() && self.error.is_some(),
        }
    }

    /// Time from submission to the last status change (or to now, while pending).
    pub fn elapsed(&self) -> chrono::Duration {
        let end = if self.is_terminal() {
            self.updated_at
        } else {
            Utc::now()
        };
        end - self.created_at
    }
}

impl Default for JobRecord {
    fn default() -> Self {
        Self::new()
    }
}
