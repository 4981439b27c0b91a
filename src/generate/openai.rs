//! Chat-completions client for OpenAI-compatible APIs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::error::JobError;
use crate::types::case_study::CaseStudy;

use super::{parse_completion, ContentGenerator, SYSTEM_PROMPT};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

/// [`ContentGenerator`] backed by a `/chat/completions` endpoint.
///
/// Transport failures are reported as `"failed to connect to AI model"` and
/// HTTP 429 as `"rate limited"`; details go to the `debug` log rather than
/// into the job's error.
#[derive(Clone)]
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl OpenAiGenerator {
    /// Creates a generator using the default model and API base.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Sets the chat model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the API base URL (e.g. a proxy or a compatible server).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Uses a preconfigured HTTP client (timeouts, proxies, ...).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The configured model.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for OpenAiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiGenerator")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ContentGenerator for OpenAiGenerator {
    async fn generate(&self, request: &str) -> Result<CaseStudy, JobError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: request,
                },
            ],
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "chat completion request failed");
                JobError::generation("failed to connect to AI model")
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(JobError::generation("rate limited"));
        }
        if !status.is_success() {
            tracing::debug!(%status, "chat completion returned an error status");
            return Err(JobError::generation("failed to connect to AI model"));
        }

        let reply: ChatResponse = response.json().await.map_err(|e| {
            tracing::debug!(error = %e, "chat completion body is not valid JSON");
            JobError::generation("invalid AI response, try again?")
        })?;

        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| JobError::generation("AI model returned no content"))?;
        tracing::debug!(bytes = content.len(), "chat completion received");

        parse_completion(&content)
    }
}
