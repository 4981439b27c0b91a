//! Status types and the generated document shape.

pub mod case_study;
pub mod job;

pub use case_study::{CaseStudy, CaseStudyEnvelope, RefusalPayload};
pub use job::{JobState, JobStatus, StatusReport};
