//! Content generation: turning a free-text request into a [`CaseStudy`].
//!
//! [`ContentGenerator`] is the seam the worker depends on. The
//! [`OpenAiGenerator`](openai::OpenAiGenerator) implementation (behind the
//! `openai` feature) asks a chat model for JSON matching [`SYSTEM_PROMPT`]
//! and parses the reply with [`parse_completion`].

#[cfg(feature = "openai")]
pub mod openai;
pub mod prompt;

use async_trait::async_trait;

use crate::error::JobError;
use crate::types::case_study::{CaseStudy, CaseStudyEnvelope, RefusalPayload};

#[cfg(feature = "openai")]
pub use openai::OpenAiGenerator;
pub use prompt::SYSTEM_PROMPT;

/// Produces a structured document for a request.
///
/// Implementations may take tens of seconds and may fail; failures are
/// reported as [`JobError::Generation`].
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generates a case study for `request`.
    async fn generate(&self, request: &str) -> Result<CaseStudy, JobError>;
}

/// Parses the text of a model reply into a [`CaseStudy`].
///
/// The reply is expected to be `{"case_study": {...}}`. A reply of the form
/// `{"error": "..."}` is the model declining the request; its message is
/// surfaced as-is. Anything else is reported as an invalid response.
///
/// # Examples
///
/// ```
/// use casegen::generate::parse_completion;
/// use casegen::JobError;
///
/// let err = parse_completion(r#"{"error": "not a business question"}"#).unwrap_err();
/// assert!(matches!(err, JobError::Generation { message } if message == "not a business question"));
///
/// let err = parse_completion("sorry, I can't do that").unwrap_err();
/// assert!(matches!(err, JobError::Generation { .. }));
/// ```
pub fn parse_completion(content: &str) -> Result<CaseStudy, JobError> {
    let body = strip_code_fence(content);
    match serde_json::from_str::<CaseStudyEnvelope>(body) {
        Ok(envelope) => Ok(envelope.case_study),
        Err(study_err) => match serde_json::from_str::<RefusalPayload>(body) {
            Ok(refusal) => Err(JobError::generation(refusal.error)),
            Err(refusal_err) => {
                tracing::debug!(
                    %study_err,
                    %refusal_err,
                    "model reply is neither a case study nor a refusal"
                );
                Err(JobError::generation("invalid AI response, try again?"))
            }
        },
    }
}

/// Removes a surrounding Markdown code fence, which models add despite being
/// told not to.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening fence line.
    match inner.split_once('\n') {
        Some((info, body)) if !info.trim_start().starts_with('{') => body.trim(),
        _ => inner.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn reply() -> String {
        json!({
            "case_study": {
                "title": "Logistics Optimization at Acme Corp",
                "company_a_name": "Acme Corp",
                "company_a_summary": "Acme Corp is a manufacturer.",
                "company_b_name": "Globex",
                "company_b_summary": "Globex is a distributor.",
                "context": ["Freight costs rose."],
                "approach": ["Step 1: audit carriers.", "Step 2: consolidate routes."],
                "impact": ["Outcome 1: 12% lower cost."]
            }
        })
        .to_string()
    }

    #[test]
    fn parses_case_study_envelope() {
        let study = parse_completion(&reply()).unwrap();
        assert_eq!(study.title, "Logistics Optimization at Acme Corp");
        assert_eq!(study.company_b_name, "Globex");
        assert_eq!(
            study.approach,
            vec!["Step 1: audit carriers.", "Step 2: consolidate routes."]
        );
    }

    #[test]
    fn parses_fenced_reply() {
        let fenced = format!("```json\n{}\n```", reply());
        assert_eq!(
            parse_completion(&fenced).unwrap().title,
            "Logistics Optimization at Acme Corp"
        );

        let bare_fence = format!("```{}```", reply());
        assert!(parse_completion(&bare_fence).is_ok());
    }

    #[test]
    fn refusal_message_is_surfaced() {
        let err = parse_completion(r#"{"error": "please describe a business problem"}"#).unwrap_err();
        assert_eq!(err.failure_message(), "please describe a business problem");
    }

    #[test]
    fn garbage_is_invalid_response() {
        let err = parse_completion("<html>oops</html>").unwrap_err();
        assert_eq!(err.failure_message(), "invalid AI response, try again?");

        let err = parse_completion(r#"{"case_study": {"title": 7}}"#).unwrap_err();
        assert_eq!(err.failure_message(), "invalid AI response, try again?");
    }
}
