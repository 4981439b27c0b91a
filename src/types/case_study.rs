//! The structured document produced by the content generator.
//!
//! Field names match the JSON the generator is instructed to emit, so the
//! same types parse the model's reply and serialize the document back out.

use serde::{Deserialize, Serialize};

/// A consultancy case study comparing two companies.
///
/// # Examples
///
/// ```
/// use casegen::CaseStudy;
///
/// let study: CaseStudy = serde_json::from_str(r#"{
///     "title": "Logistics Optimization at Acme Corp",
///     "company_a_name": "Acme Corp",
///     "company_a_summary": "Acme Corp ships widgets.",
///     "company_b_name": "Globex",
///     "company_b_summary": "Globex ships gadgets.",
///     "context": ["Freight costs rose 30%."],
///     "approach": ["Step 1: consolidate carriers."],
///     "impact": ["Outcome 1: 12% lower cost."]
/// }"#).unwrap();
///
/// assert_eq!(study.title, "Logistics Optimization at Acme Corp");
/// assert_eq!(study.approach.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CaseStudy {
    /// Document title.
    pub title: String,

    /// Name of the first company.
    pub company_a_name: String,

    /// Narrative summary of the first company.
    pub company_a_summary: String,

    /// Name of the second company.
    pub company_b_name: String,

    /// Narrative summary of the second company.
    pub company_b_summary: String,

    /// Background points, in order.
    #[serde(default)]
    pub context: Vec<String>,

    /// Steps taken, in order.
    #[serde(default)]
    pub approach: Vec<String>,

    /// Outcomes, in order.
    #[serde(default)]
    pub impact: Vec<String>,
}

/// Top-level wrapper the generator is asked to reply with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseStudyEnvelope {
    /// The document.
    pub case_study: CaseStudy,
}

/// Reply shape the generator uses to refuse a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefusalPayload {
    /// Explanation supplied by the generator.
    pub error: String,
}
