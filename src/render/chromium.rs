//! PDF rendering through a headless Chromium.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;

use crate::constants::{
    ARTIFACT_FILE_NAME, DEFAULT_CHROMIUM_BIN, DEFAULT_WINDOW_SIZE, SLIDES_FILE_NAME,
};
use crate::error::JobError;
use crate::types::case_study::CaseStudy;

use super::{render_html, Renderer};

/// Prints the slide template to PDF with `chromium --headless`.
///
/// Each render gets its own directory under the work root, holding
/// `slides.html` and the printed `output.pdf`. After a successful render the
/// directory stays on disk and the returned path belongs to the job's
/// artifact. A failed or abandoned render removes its directory.
///
/// The browser is killed if the render future is dropped before it exits,
/// e.g. when the job runs past its deadline.
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    binary: PathBuf,
    window_size: (u32, u32),
    work_root: PathBuf,
}

impl Default for ChromiumRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChromiumRenderer {
    /// Uses `chromium` from `PATH` and the system temp directory.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_CHROMIUM_BIN),
            window_size: DEFAULT_WINDOW_SIZE,
            work_root: std::env::temp_dir(),
        }
    }

    /// Sets the browser executable.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Sets the viewport, in pixels.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Sets the directory under which per-render directories are created.
    pub fn with_work_root(mut self, work_root: impl Into<PathBuf>) -> Self {
        self.work_root = work_root.into();
        self
    }

    /// The browser executable.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    async fn prepare_workdir(&self, document: &CaseStudy) -> Result<WorkDir, JobError> {
        let path = self
            .work_root
            .join(format!("slides-{}", uuid::Uuid::new_v4().simple()));
        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|e| JobError::render(format!("failed to create {}: {e}", path.display())))?;
        let dir = WorkDir { path, keep: false };
        tokio::fs::write(dir.path.join(SLIDES_FILE_NAME), render_html(document))
            .await
            .map_err(|e| JobError::render(format!("failed to write slides: {e}")))?;
        Ok(dir)
    }

    async fn print_pdf(&self, dir: &Path) -> Result<PathBuf, JobError> {
        let (width, height) = self.window_size;
        tracing::debug!(
            binary = %self.binary.display(),
            dir = %dir.display(),
            "printing slides to pdf"
        );

        let output = tokio::process::Command::new(&self.binary)
            .arg("--headless=new")
            .arg(format!("--print-to-pdf={ARTIFACT_FILE_NAME}"))
            .arg(format!("--window-size={width},{height}"))
            .arg("--no-pdf-header-footer")
            .arg(SLIDES_FILE_NAME)
            .current_dir(dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                JobError::render(format!(
                    "failed to spawn {}: {e}",
                    self.binary.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                code = ?output.status.code(),
                stderr = %stderr.trim(),
                "chromium exited unsuccessfully"
            );
            return Err(JobError::render(match output.status.code() {
                Some(code) => format!("chromium exited with status {code}"),
                None => "chromium was terminated by a signal".to_string(),
            }));
        }

        let pdf = dir.join(ARTIFACT_FILE_NAME);
        if !tokio::fs::try_exists(&pdf).await.unwrap_or(false) {
            return Err(JobError::render("chromium produced no output"));
        }
        Ok(pdf)
    }
}

/// A render directory that is removed on drop unless kept.
struct WorkDir {
    path: PathBuf,
    keep: bool,
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            tracing::debug!(dir = %self.path.display(), error = %e, "could not remove render directory");
        }
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn render(&self, document: &CaseStudy) -> Result<PathBuf, JobError> {
        let mut dir = self.prepare_workdir(document).await?;
        let pdf = self.print_pdf(&dir.path).await?;
        dir.keep = true;
        Ok(pdf)
    }
}
