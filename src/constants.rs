//! Defaults shared by the job service, the collaborators, and the CLI.

/// Minimum number of characters a request must carry before a job is created.
///
/// Shorter requests do not give the generator enough to work with and are
/// rejected synchronously with [`JobError::Validation`](crate::JobError::Validation).
pub const MIN_REQUEST_LEN: usize = 8;

/// Poll interval suggested to callers waiting on a pending job.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Chat model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Base URL of the OpenAI-compatible API.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Browser binary used to print slides to PDF.
pub const DEFAULT_CHROMIUM_BIN: &str = "chromium";

/// Name of the HTML page written into each render directory.
pub const SLIDES_FILE_NAME: &str = "slides.html";

/// Name of the PDF produced inside each render directory.
pub const ARTIFACT_FILE_NAME: &str = "output.pdf";

/// Author line printed on the title slide.
pub const DEFAULT_AUTHOR: &str = "AI";

/// Browser viewport used when printing, in pixels.
pub const DEFAULT_WINDOW_SIZE: (u32, u32) = (1920, 1080);
