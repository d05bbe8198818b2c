//! Fatal error types for the crawl.
//!
//! Per-URL fetch failures are deliberately not represented here; they are
//! recovered inside the loop iteration (see [`crate::fetch::FetchError`]).
//! Only failures that would corrupt the resumability guarantee surface
//! through this type.

use thiserror::Error;

/// Result alias for fatal crawl operations.
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Errors that abort the crawl run.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Reading seeds or writing a snapshot/page file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The frontier snapshot could not be serialized or parsed.
    #[error("frontier snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// The HTTP client could not be constructed.
    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),
}
