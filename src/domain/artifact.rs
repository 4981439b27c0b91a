//! The output of a finished job.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::case_study::CaseStudy;

/// A rendered file together with the document it was rendered from.
///
/// The file stays on disk for the lifetime of the process; nothing in the
/// crate deletes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Where the rendered file lives.
    pub location: PathBuf,

    /// The structured document the file was rendered from.
    pub document: CaseStudy,
}

impl Artifact {
    /// Creates an artifact for a rendered file.
    pub fn new(location: impl Into<PathBuf>, document: CaseStudy) -> Self {
        Self {
            location: location.into(),
            document,
        }
    }

    /// Path of the rendered file.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Title of the document.
    pub fn title(&self) -> &str {
        &self.document.title
    }

    /// Reads the rendered file into memory.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file is missing or unreadable.
    pub async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.location).await
    }
}
