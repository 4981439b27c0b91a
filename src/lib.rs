//! # casegen
//!
//! Asynchronous job lifecycle for generating consulting case studies.
//!
//! A caller submits a free-text request to a [`JobService`]. The service
//! validates it, records a `Pending` job in a [`JobStore`](store::JobStore),
//! and runs a [`Worker`] for it on a background tokio task. The caller polls
//! [`JobService::status`] and fetches the finished [`Artifact`] with
//! [`JobService::result`].
//!
//! The production worker, [`CaseStudyWorker`], asks a
//! [`ContentGenerator`](generate::ContentGenerator) for a [`CaseStudy`] and
//! hands it to a [`Renderer`](render::Renderer) that produces a PDF.
//!
//! ## Modules
//!
//! - [`store`]: concurrency-safe job records
//! - [`executor`]: background dispatch with optional admission and deadlines
//! - [`service`]: submit, status, and result
//! - [`generate`]: chat-model content generation
//! - [`render`]: HTML slides printed to PDF
//!
//! ## Features
//!
//! - `openai` (default): [`OpenAiGenerator`](generate::OpenAiGenerator) via `reqwest`
//! - `logging` (default): [`init_logging`] via `tracing-subscriber`
//! - `cli` (default): the `casegen` binary and [`config::Config`]

#[cfg(feature = "cli")]
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod executor;
pub mod generate;
#[cfg(feature = "logging")]
pub mod logging;
pub mod render;
pub mod service;
pub mod store;
pub mod types;
pub mod worker;

pub use domain::{new_job_id, Artifact, JobId, JobRecord};
pub use error::JobError;
pub use executor::{ExecutorConfig, JobExecutor};
#[cfg(feature = "logging")]
pub use logging::init_logging;
pub use service::{JobService, ServiceConfig};
pub use types::{CaseStudy, JobState, JobStatus, StatusReport};
pub use worker::{CaseStudyWorker, Worker};
