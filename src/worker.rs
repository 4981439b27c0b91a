//! The unit of work a job runs.
//!
//! [`Worker`] is the contract the executor needs: take the request text,
//! take as long as necessary, and return an [`Artifact`] or an error.
//! [`CaseStudyWorker`] is the production worker that chains a
//! [`ContentGenerator`] and a [`Renderer`].

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::domain::Artifact;
use crate::error::JobError;
use crate::executor::duration_ms;
use crate::generate::ContentGenerator;
use crate::render::Renderer;

/// Performs the slow part of a job.
///
/// The executor invokes [`run`](Worker::run) exactly once per dispatched job
/// and never retries; any retry policy belongs inside the implementation.
/// A single worker value may serve many jobs concurrently.
#[async_trait]
pub trait Worker: Send + Sync {
    /// Produces the artifact for `request`.
    async fn run(&self, request: &str) -> Result<Artifact, JobError>;
}

/// Generates a case study for the request, then renders it to a file.
pub struct CaseStudyWorker {
    generator: Arc<dyn ContentGenerator>,
    renderer: Arc<dyn Renderer>,
}

impl CaseStudyWorker {
    /// Creates a worker from its two collaborators.
    pub fn new(generator: Arc<dyn ContentGenerator>, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            generator,
            renderer,
        }
    }
}

impl std::fmt::Debug for CaseStudyWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaseStudyWorker").finish_non_exhaustive()
    }
}

#[async_trait]
impl Worker for CaseStudyWorker {
    async fn run(&self, request: &str) -> Result<Artifact, JobError> {
        let started = Instant::now();
        let document = self.generator.generate(request).await?;
        tracing::debug!(
            title = %document.title,
            elapsed_ms = duration_ms(started.elapsed()),
            "case study generated"
        );

        let location = self.renderer.render(&document).await?;
        tracing::debug!(
            location = %location.display(),
            elapsed_ms = duration_ms(started.elapsed()),
            "case study rendered"
        );

        Ok(Artifact::new(location, document))
    }
}
