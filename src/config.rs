//! Runtime configuration from flags and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::constants::{
    DEFAULT_API_BASE, DEFAULT_CHROMIUM_BIN, DEFAULT_MODEL, DEFAULT_POLL_INTERVAL_MS,
    MIN_REQUEST_LEN,
};
use crate::error::JobError;
use crate::executor::ExecutorConfig;
use crate::service::ServiceConfig;

/// Settings for the generator, the renderer, and the job service.
///
/// Every flag can also be given through the environment variable shown in
/// `--help`; flags win over the environment.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// OpenAI API key
    #[arg(long, env = "OPENAI_KEY", hide_env_values = true)]
    pub openai_key: Option<String>,

    /// File holding the OpenAI API key (takes precedence over --openai-key)
    #[arg(long, env = "OPENAI_KEY_PATH")]
    pub openai_key_path: Option<PathBuf>,

    /// Chat model used to write the case study
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Chromium executable used to print PDFs
    #[arg(long, env = "CHROMIUM_BIN", default_value = DEFAULT_CHROMIUM_BIN)]
    pub chromium: PathBuf,

    /// Upper bound on jobs running at once (unbounded if unset)
    #[arg(long, env = "MAX_CONCURRENT_JOBS")]
    pub max_concurrent_jobs: Option<usize>,

    /// Fail a job that runs longer than this many seconds
    #[arg(long, env = "JOB_TIMEOUT_SECS")]
    pub job_timeout_secs: Option<u64>,

    /// Delay between status polls
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    pub poll_interval_ms: u64,

    /// Shortest accepted request, in characters
    #[arg(long, default_value_t = MIN_REQUEST_LEN)]
    pub min_prompt_len: usize,
}

impl Config {
    /// Returns the API key, reading the key file when one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Config`] if the key file cannot be read or no
    /// non-empty key is available.
    pub fn resolve_api_key(&self) -> Result<String, JobError> {
        let key = match &self.openai_key_path {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                JobError::Config(format!("failed to read key file {}: {e}", path.display()))
            })?,
            None => self.openai_key.clone().unwrap_or_default(),
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(JobError::Config(
                "OpenAI key not set; use OPENAI_KEY or OPENAI_KEY_PATH".to_string(),
            ));
        }
        Ok(key.to_string())
    }

    /// Executor policy derived from the concurrency and timeout settings.
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            max_concurrent_jobs: self.max_concurrent_jobs,
            job_timeout: self.job_timeout_secs.map(Duration::from_secs),
        }
    }

    /// Service settings derived from this configuration.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            min_request_len: self.min_prompt_len,
            poll_interval_ms: self.poll_interval_ms,
            executor: self.executor_config(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        config: Config,
    }

    fn parse(args: &[&str]) -> Config {
        Harness::try_parse_from(std::iter::once("casegen").chain(args.iter().copied()))
            .unwrap()
            .config
    }

    #[test]
    fn explicit_flags() {
        let config = parse(&[
            "--openai-key",
            "sk-flag",
            "--model",
            "gpt-test",
            "--api-base",
            "http://localhost:9999/v1",
            "--chromium",
            "/usr/bin/chromium-browser",
            "--max-concurrent-jobs",
            "4",
            "--job-timeout-secs",
            "120",
            "--poll-interval-ms",
            "250",
            "--min-prompt-len",
            "12",
        ]);

        assert_eq!(config.resolve_api_key().unwrap(), "sk-flag");
        assert_eq!(config.model, "gpt-test");
        assert_eq!(config.chromium, PathBuf::from("/usr/bin/chromium-browser"));
        assert_eq!(
            config.service_config(),
            ServiceConfig {
                min_request_len: 12,
                poll_interval_ms: 250,
                executor: ExecutorConfig {
                    max_concurrent_jobs: Some(4),
                    job_timeout: Some(Duration::from_secs(120)),
                },
            }
        );
    }

    #[test]
    fn key_file_wins_and_is_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  sk-from-file  ").unwrap();

        let path = file.path().to_str().unwrap();
        let config = parse(&["--openai-key", "sk-flag", "--openai-key-path", path]);
        assert_eq!(config.resolve_api_key().unwrap(), "sk-from-file");
    }

    #[test]
    fn missing_or_blank_key_is_config_error() {
        let mut config = parse(&["--openai-key", "   "]);
        assert!(matches!(config.resolve_api_key(), Err(JobError::Config(_))));

        config.openai_key = None;
        config.openai_key_path = Some(PathBuf::from("/nonexistent/casegen/key"));
        let err = config.resolve_api_key().unwrap_err();
        assert!(err.to_string().contains("failed to read key file"));
    }
}
