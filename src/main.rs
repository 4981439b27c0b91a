//! casegen: generate a consulting case study PDF from a one-line prompt.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use casegen::config::Config;
use casegen::generate::OpenAiGenerator;
use casegen::render::ChromiumRenderer;
use casegen::store::InMemoryJobStore;
use casegen::{init_logging, CaseStudyWorker, JobService, JobState};

/// Generate a case study PDF with an AI model and headless Chromium
#[derive(Parser)]
#[command(name = "casegen")]
#[command(about = "Generate a consulting case study PDF from a prompt", long_about = None)]
#[command(version)]
struct Cli {
    /// What the case study should be about
    #[arg(required = true, num_args = 1..)]
    prompt: Vec<String>,

    #[command(flatten)]
    config: Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = cli.config;

    let api_key = config.resolve_api_key()?;
    let generator = OpenAiGenerator::new(api_key)
        .with_model(&config.model)
        .with_api_base(&config.api_base);
    let renderer = ChromiumRenderer::new().with_binary(&config.chromium);
    let worker = CaseStudyWorker::new(Arc::new(generator), Arc::new(renderer));

    let service = JobService::with_config(
        Arc::new(InMemoryJobStore::new()),
        Arc::new(worker),
        config.service_config(),
    );

    let prompt = cli.prompt.join(" ");
    let job_id = service.submit(&prompt).await?;
    tracing::info!(job_id = %job_id, model = %config.model, "generating case study");

    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    loop {
        match service.status(&job_id).await {
            JobState::Pending => tokio::time::sleep(poll_interval).await,
            state => {
                tracing::debug!(job_id = %job_id, status = %state, "job settled");
                break;
            }
        }
    }

    let artifact = service
        .result(&job_id)
        .await
        .with_context(|| format!("case study {job_id} was not produced"))?;

    println!("{}", artifact.title());
    println!("{}", artifact.location().display());
    Ok(())
}
