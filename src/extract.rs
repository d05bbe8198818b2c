//! Link discovery over raw page text.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use url::{Position, Url};

/// Fully-qualified `http(s)://` references anywhere in the page text.
fn absolute_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"https?://[\w_-]+(?:\.[\w_-]+)+[\w.,@?^=%&:/~+#-]*[\w@?^=%&/~+#-]")
            .expect("absolute url regex compiles")
    })
}

/// Conventional `href="/path"` site-relative references.
fn relative_href_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"href="(/.*?)""#).expect("relative href regex compiles"))
}

/// Extracts the set of absolute URLs reachable from a fetched page.
///
/// Two kinds of references are recognized: absolute links embedded anywhere
/// in the text, and `href="/path"` references resolved against the scheme and
/// host of `page_url` itself. Results are deduplicated within the page.
/// Matches that fail to parse, or relative references on a page with no host,
/// are dropped without error.
pub fn extract_links(body: &str, page_url: &Url) -> HashSet<String> {
    let mut links = HashSet::new();

    for found in absolute_url_re().find_iter(body) {
        if let Ok(url) = Url::parse(found.as_str()) {
            links.insert(url.to_string());
        }
    }

    if page_url.host_str().is_none() {
        return links;
    }
    // Scheme, host, and port of the source page; each page's relative links
    // resolve against that page's own origin.
    let origin = &page_url[..Position::BeforePath];

    for captured in relative_href_re().captures_iter(body) {
        let path = &captured[1];
        if let Ok(url) = Url::parse(&format!("{origin}{path}")) {
            links.insert(url.to_string());
        }
    }

    links
}
