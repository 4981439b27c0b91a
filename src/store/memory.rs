//! In-memory job store.
//!
//! [`InMemoryJobStore`] keeps records in a `DashMap<JobId, JobRecord>`.
//! Reads clone the record while holding its shard's read lock; mutations
//! validate and apply the transition while holding the shard's write lock.
//! A reader therefore sees either the whole `Pending` record or the whole
//! terminal record, never a mix.
//!
//! Records are never evicted implicitly. [`InMemoryJobStore::purge_finished_before`]
//! is available for callers that want a retention sweep; the job service never
//! calls it.
//!
//! # Examples
//!
//! ```
//! use casegen::store::{InMemoryJobStore, JobStore};
//! use casegen::JobStatus;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = InMemoryJobStore::new();
//! let id = store.create().await.unwrap();
//!
//! let record = store.get(&id).await.unwrap();
//! assert_eq!(record.status, JobStatus::Pending);
//! assert_eq!(store.len(), 1);
//!
//! store.fail(&id, "rate limited".to_string()).await.unwrap();
//! assert_eq!(store.get(&id).await.unwrap().status, JobStatus::Failed);
//! # });
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{Artifact, JobId, JobRecord};
use crate::error::JobError;

use super::JobStore;

/// Thread-safe, volatile job store backed by [`DashMap`].
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    records: DashMap<JobId, JobRecord>,
}

impl InMemoryJobStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Applies `mutate` to the record under its shard's write lock and returns
    /// a snapshot of the result.
    fn update<F>(&self, job_id: &str, mutate: F) -> Result<JobRecord, JobError>
    where
        F: FnOnce(&mut JobRecord) -> Result<(), JobError>,
    {
        let mut entry = self
            .records
            .get_mut(job_id)
            .ok_or_else(|| JobError::NotFound {
                job_id: job_id.to_string(),
            })?;
        mutate(entry.value_mut())?;
        Ok(entry.value().clone())
    }

    /// Removes terminal records last updated before `cutoff`.
    ///
    /// Pending records are always kept. Returns the number removed.
    pub fn purge_finished_before(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.records.len();
        self.records
            .retain(|_, record| !(record.is_terminal() && record.updated_at < cutoff));
        let removed = before.saturating_sub(self.records.len());
        if removed > 0 {
            tracing::debug!(removed, "purged finished jobs");
        }
        removed
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self) -> Result<JobId, JobError> {
        loop {
            let record = JobRecord::new();
            match self.records.entry(record.id.clone()) {
                Entry::Vacant(slot) => {
                    let id = record.id.clone();
                    slot.insert(record);
                    return Ok(id);
                }
                Entry::Occupied(_) => {
                    tracing::error!(job_id = %record.id, "job id collision, minting another");
                }
            }
        }
    }

    async fn get(&self, job_id: &str) -> Option<JobRecord> {
        self.records.get(job_id).map(|entry| entry.value().clone())
    }

    async fn complete(&self, job_id: &str, artifact: Artifact) -> Result<JobRecord, JobError> {
        self.update(job_id, |record| record.complete(artifact))
    }

    async fn fail(&self, job_id: &str, message: String) -> Result<JobRecord, JobError> {
        self.update(job_id, |record| record.fail(message))
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
