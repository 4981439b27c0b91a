//! End-to-end lifecycle tests through JobService.
//!
//! Workers and collaborators are scripted doubles. The generator is gated
//! with a `tokio::sync::Semaphore` holding one permit per job it may answer,
//! so "right after submit" assertions do not depend on scheduling.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use casegen::generate::ContentGenerator;
use casegen::render::Renderer;
use casegen::store::{InMemoryJobStore, JobStore};
use casegen::{
    Artifact, CaseStudy, CaseStudyWorker, ExecutorConfig, JobError, JobService, JobState,
    JobStatus, ServiceConfig, Worker,
};
use pretty_assertions::assert_eq;
use tokio::sync::Semaphore;

// ─── Test doubles ───────────────────────────────────────────────────────────

/// Generator that waits for a released permit, then answers from the request.
struct ScriptedGenerator {
    permits: Semaphore,
    gated: bool,
}

impl ScriptedGenerator {
    fn gated() -> Arc<Self> {
        Arc::new(Self {
            permits: Semaphore::new(0),
            gated: true,
        })
    }

    fn immediate() -> Arc<Self> {
        Arc::new(Self {
            permits: Semaphore::new(0),
            gated: false,
        })
    }

    /// Lets `jobs` more generations through.
    fn release(&self, jobs: usize) {
        self.permits.add_permits(jobs);
    }
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn generate(&self, request: &str) -> Result<CaseStudy, JobError> {
        if self.gated {
            self.permits
                .acquire()
                .await
                .map_err(|_| JobError::generation("generator closed"))?
                .forget();
        }
        if request.contains("rate") {
            return Err(JobError::generation("rate limited"));
        }
        Ok(CaseStudy {
            title: "Logistics Optimization at Acme Corp".to_string(),
            company_a_name: "Acme Corp".to_string(),
            company_a_summary: "A manufacturer of anvils.".to_string(),
            company_b_name: "Globex".to_string(),
            company_b_summary: "A freight forwarder.".to_string(),
            context: vec!["Logistics costs rose 30% in two years.".to_string()],
            approach: vec!["Step 1: consolidate carriers.".to_string()],
            impact: vec!["Outcome 1: 18% lower freight spend.".to_string()],
        })
    }
}

/// Renderer that records how often it ran and returns a fixed location.
#[derive(Default)]
struct RecordingRenderer {
    calls: AtomicUsize,
}

#[async_trait]
impl Renderer for RecordingRenderer {
    async fn render(&self, _document: &CaseStudy) -> Result<PathBuf, JobError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(PathBuf::from("/tmp/slides-acme/output.pdf"))
    }
}

/// Worker that counts how many invocations are running at once.
struct ConcurrencyMeter {
    running: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl Worker for ConcurrencyMeter {
    async fn run(&self, request: &str) -> Result<Artifact, JobError> {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.running.fetch_sub(1, Ordering::SeqCst);
        Ok(Artifact::new(
            "/tmp/bounded.pdf",
            CaseStudy {
                title: request.to_string(),
                ..CaseStudy::default()
            },
        ))
    }
}

struct PanickingWorker;

#[async_trait]
impl Worker for PanickingWorker {
    async fn run(&self, _request: &str) -> Result<Artifact, JobError> {
        panic!("template missing");
    }
}

fn service_with(
    generator: Arc<ScriptedGenerator>,
    renderer: Arc<RecordingRenderer>,
) -> (JobService, Arc<InMemoryJobStore>) {
    let store = Arc::new(InMemoryJobStore::new());
    let worker = CaseStudyWorker::new(generator, renderer);
    (JobService::new(store.clone(), Arc::new(worker)), store)
}

async fn wait_settled(service: &JobService, id: &str) -> JobState {
    for _ in 0..10_000 {
        let state = service.status(id).await;
        if state.is_settled() {
            return state;
        }
        tokio::task::yield_now().await;
    }
    panic!("job {id} never settled");
}

// ─── Scenarios ──────────────────────────────────────────────────────────────

mod scenario_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_successful_case_study() {
        let generator = ScriptedGenerator::gated();
        let renderer = Arc::new(RecordingRenderer::default());
        let (service, _store) = service_with(generator.clone(), renderer.clone());

        let id = service
            .submit("Acme Corp wants to reduce logistics cost")
            .await
            .unwrap();
        assert_eq!(service.status(&id).await, JobState::Pending);
        assert!(matches!(
            service.result(&id).await,
            Err(JobError::StillPending { .. })
        ));

        generator.release(1);
        assert_eq!(wait_settled(&service, &id).await, JobState::Complete);

        let artifact = service.result(&id).await.unwrap();
        assert_eq!(artifact.title(), "Logistics Optimization at Acme Corp");
        assert_eq!(artifact.document.company_a_name, "Acme Corp");
        assert_eq!(
            artifact.location(),
            std::path::Path::new("/tmp/slides-acme/output.pdf")
        );
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_request_is_rejected_synchronously() {
        let (service, store) = service_with(
            ScriptedGenerator::immediate(),
            Arc::new(RecordingRenderer::default()),
        );
        service.submit("a longer valid request").await.unwrap();
        let before = store.len();

        let err = service.submit("hi").await.unwrap_err();
        assert!(matches!(err, JobError::Validation { .. }));
        assert!(!err.is_retryable());
        assert_eq!(store.len(), before);
    }

    #[tokio::test]
    async fn test_generation_failure_is_reported() {
        let renderer = Arc::new(RecordingRenderer::default());
        let (service, _store) = service_with(ScriptedGenerator::immediate(), renderer.clone());

        let id = service.submit("please rate limit me now").await.unwrap();
        assert_eq!(wait_settled(&service, &id).await, JobState::Failed);

        match service.result(&id).await.unwrap_err() {
            JobError::JobFailed { job_id, message } => {
                assert_eq!(job_id, id);
                assert_eq!(message, "rate limited");
            }
            other => panic!("expected JobFailed, got {other:?}"),
        }
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let (service, _store) = service_with(
            ScriptedGenerator::immediate(),
            Arc::new(RecordingRenderer::default()),
        );
        let fake = uuid::Uuid::new_v4().to_string();
        assert_eq!(service.status(&fake).await, JobState::Unknown);
        assert!(matches!(
            service.result(&fake).await,
            Err(JobError::NotFound { job_id }) if job_id == fake
        ));
    }
}

// ─── Lifecycle properties ───────────────────────────────────────────────────

mod lifecycle_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_terminal_status_never_changes() {
        let (service, _store) = service_with(
            ScriptedGenerator::immediate(),
            Arc::new(RecordingRenderer::default()),
        );
        let id = service.submit("Acme Corp wants to reduce logistics cost").await.unwrap();
        let settled = wait_settled(&service, &id).await;

        for _ in 0..100 {
            tokio::task::yield_now().await;
            assert_eq!(service.status(&id).await, settled);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submits_are_distinct() {
        let generator = ScriptedGenerator::gated();
        let (service, store) =
            service_with(generator.clone(), Arc::new(RecordingRenderer::default()));

        let submits: Vec<_> = (0..64)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move { service.submit(&format!("request number {i}")).await })
            })
            .collect();
        let ids: HashSet<_> = futures::future::join_all(submits)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .collect();

        assert_eq!(ids.len(), 64);
        for id in &ids {
            assert_eq!(service.status(id).await, JobState::Pending);
        }

        generator.release(64);
        for id in &ids {
            assert_eq!(wait_settled(&service, id).await, JobState::Complete);
        }
        assert_eq!(store.len(), 64);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_pollers_observe_monotonic_states() {
        let generator = ScriptedGenerator::gated();
        let (service, store) =
            service_with(generator.clone(), Arc::new(RecordingRenderer::default()));
        let id = service.submit("Acme Corp wants to reduce logistics cost").await.unwrap();

        let pollers: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let id = id.clone();
                tokio::spawn(async move {
                    let mut terminal = None;
                    let mut reads_after_terminal = 0;
                    while reads_after_terminal < 50 {
                        let record = store.get(&id).await.unwrap();
                        assert!(record.is_consistent(), "torn record: {record:?}");
                        match terminal {
                            None if record.status != JobStatus::Pending => {
                                terminal = Some(record.status);
                            }
                            None => {}
                            Some(status) => {
                                assert_eq!(record.status, status, "terminal status changed");
                                reads_after_terminal += 1;
                            }
                        }
                        tokio::task::yield_now().await;
                    }
                    terminal
                })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(10)).await;
        generator.release(1);

        for status in futures::future::join_all(pollers).await {
            assert_eq!(status.unwrap(), Some(JobStatus::Complete));
        }
    }

    #[tokio::test]
    async fn test_panicking_worker_fails_job() {
        let store = Arc::new(InMemoryJobStore::new());
        let service = JobService::new(store.clone(), Arc::new(PanickingWorker));

        let id = service.submit("Acme Corp wants to reduce logistics cost").await.unwrap();
        assert_eq!(wait_settled(&service, &id).await, JobState::Failed);

        let record = store.get(&id).await.unwrap();
        assert_eq!(
            record.error.as_deref(),
            Some("worker panicked: template missing")
        );
    }
}

// ─── Execution policy ───────────────────────────────────────────────────────

mod policy_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_limit_is_respected() {
        let meter = Arc::new(ConcurrencyMeter {
            running: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let config = ServiceConfig {
            executor: ExecutorConfig::default().with_max_concurrent_jobs(2),
            ..ServiceConfig::default()
        };
        let service =
            JobService::with_config(Arc::new(InMemoryJobStore::new()), meter.clone(), config);

        let mut ids = Vec::new();
        for i in 0..8 {
            ids.push(service.submit(&format!("bounded job {i}")).await.unwrap());
        }
        for id in &ids {
            assert_eq!(wait_settled(&service, id).await, JobState::Complete);
        }

        assert!(meter.peak.load(Ordering::SeqCst) <= 2);
        assert!(meter.peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_fails_slow_job() {
        let generator = ScriptedGenerator::gated();
        let store = Arc::new(InMemoryJobStore::new());
        let worker = CaseStudyWorker::new(generator, Arc::new(RecordingRenderer::default()));
        let config = ServiceConfig {
            executor: ExecutorConfig::default().with_job_timeout(Duration::from_secs(30)),
            ..ServiceConfig::default()
        };
        let service = JobService::with_config(store.clone(), Arc::new(worker), config);

        let id = service.submit("Acme Corp wants to reduce logistics cost").await.unwrap();
        tokio::time::sleep(Duration::from_secs(31)).await;

        assert_eq!(wait_settled(&service, &id).await, JobState::Failed);
        match service.result(&id).await {
            Err(JobError::JobFailed { message, .. }) => {
                assert_eq!(message, "job timed out after 30000ms");
            }
            other => panic!("expected JobFailed, got {other:?}"),
        }
    }
}
