//! Job identifier generation.

use uuid::Uuid;

/// Opaque job identifier.
///
/// Hyphenated UUID v4 text: only ASCII hex digits and `-`, so it can be
/// embedded in a URL path segment without escaping.
pub type JobId = String;

/// Mints a new job identifier from the OS randomness source.
///
/// There is no recoverable failure: if the randomness source is unavailable
/// the `uuid` crate panics, which is treated as a process-level condition.
///
/// # Examples
///
/// ```
/// use casegen::domain::new_job_id;
///
/// let id = new_job_id();
/// assert_eq!(id.len(), 36);
/// assert!(id.chars().all(|c| c.is_ascii_hexdigit() || c == '-'));
/// ```
pub fn new_job_id() -> JobId {
    Uuid::new_v4().to_string()
}
