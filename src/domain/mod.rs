//! Domain types for the job lifecycle.
//!
//! [`JobRecord`] is the store's representation of a job, [`Artifact`] is
//! what a completed job points at, and [`new_job_id`] mints identifiers.

pub mod artifact;
pub mod id;
pub mod record;

pub use artifact::Artifact;
pub use id::{new_job_id, JobId};
pub use record::JobRecord;
