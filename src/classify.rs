//! URL classification: priority classing plus the disallowed-extension filter.

use url::Url;

/// Priority class assigned to an accepted URL.
///
/// `Primary` URLs belong to the crawl's target site and are always drained
/// before any `Secondary` URL is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// The URL belongs to the target site.
    Primary,
    /// Any other host.
    Secondary,
}

/// File extensions that are never enqueued, matched against the URL path.
///
/// This is a path-suffix denylist, not a content-type check.
pub const DISALLOWED_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".pdf", ".docx",
];

/// Classifies a candidate URL, or rejects it.
///
/// Returns `None` when the URL path ends in a disallowed extension.
/// Otherwise the URL is `Primary` when its text contains the target host
/// substring and `Secondary` in every other case. Pure and deterministic.
pub fn classify(url: &Url, target_host: &str) -> Option<Priority> {
    let path = url.path();
    if DISALLOWED_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return None;
    }

    if url.as_str().contains(target_host) {
        Some(Priority::Primary)
    } else {
        Some(Priority::Secondary)
    }
}
