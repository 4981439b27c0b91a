//! Job store trait and the in-memory implementation.
//!
//! # Architecture
//!
//! [`JobStore`] is the type-erasure interface used as `Arc<dyn JobStore>` by
//! the [`JobExecutor`](crate::executor::JobExecutor) and the
//! [`JobService`](crate::service::JobService). It is the single
//! synchronization point for job state: every read and write of a record goes
//! through it, and no caller holds a reference into its storage.
//!
//! State machine validation lives on [`JobRecord`] itself; a store only has to
//! guarantee that validation and mutation of a record happen under the same
//! exclusive access, and that readers receive owned snapshots.
//!
//! # Backends
//!
//! - [`InMemoryJobStore`](memory::InMemoryJobStore) -- `DashMap`-backed,
//!   volatile. Records live until the process exits.

pub mod memory;

use async_trait::async_trait;

use crate::domain::{Artifact, JobId, JobRecord};
use crate::error::JobError;

pub use memory::InMemoryJobStore;

/// Concurrency-safe owner of all job records.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; any number of callers may invoke
/// any method concurrently.
///
/// # Consistency
///
/// - [`get`](JobStore::get) returns a snapshot taken while no writer holds
///   the record, so `status`, `result`, and `error` are always mutually
///   consistent.
/// - A mutation is visible to every `get` that starts after it returns.
/// - Each record moves from `Pending` to a terminal status at most once;
///   later attempts fail with [`JobError::InvalidTransition`].
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Inserts a new `Pending` job and returns its ID.
    ///
    /// The ID is guaranteed not to collide with any record currently held.
    async fn create(&self) -> Result<JobId, JobError>;

    /// Returns a snapshot of the job, or `None` if the ID is unknown.
    async fn get(&self, job_id: &str) -> Option<JobRecord>;

    /// Moves a `Pending` job to `Complete`.
    ///
    /// # Errors
    ///
    /// - [`JobError::NotFound`] if no job with the given ID exists.
    /// - [`JobError::InvalidTransition`] if the job is already terminal.
    async fn complete(&self, job_id: &str, artifact: Artifact) -> Result<JobRecord, JobError>;

    /// Moves a `Pending` job to `Failed`.
    ///
    /// # Errors
    ///
    /// - [`JobError::NotFound`] if no job with the given ID exists.
    /// - [`JobError::InvalidTransition`] if the job is already terminal.
    async fn fail(&self, job_id: &str, message: String) -> Result<JobRecord, JobError>;

    /// Number of records held.
    fn len(&self) -> usize;

    /// Returns `true` if the store holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
