//! Rendering a [`CaseStudy`] into a downloadable file.

pub mod chromium;
pub mod template;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::JobError;
use crate::types::case_study::CaseStudy;

pub use chromium::ChromiumRenderer;
pub use template::{escape_html, render_html};

/// Turns a document into a file on disk.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Renders `document` and returns the path of the produced file.
    async fn render(&self, document: &CaseStudy) -> Result<PathBuf, JobError>;
}
