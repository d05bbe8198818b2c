//! Single-request HTTP fetcher with a fixed identity and a hard timeout.

use crate::controls::{CrawlControls, USER_AGENT};
use reqwest::Client;
use thiserror::Error;
use url::Url;

/// Non-fatal failure of a single fetch.
///
/// The fetcher never retries; the crawl loop abandons the URL and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure: DNS, connection, timeout, or a non-success
    /// HTTP status.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    /// The response body could not be read or decoded as text.
    #[error("body unreadable: {0}")]
    Body(#[source] reqwest::Error),
}

/// Performs one bounded GET per call over a shared client.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Builds a fetcher from the crawl controls.
    ///
    /// The timeout covers connection plus read for the whole request.
    pub fn new(controls: &CrawlControls) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(controls.fetch_timeout())
            .build()?;
        Ok(Self { client })
    }

    /// Fetches the URL and returns the decoded body text.
    pub async fn fetch_text(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(FetchError::Request)?;

        response.text().await.map_err(FetchError::Body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> Fetcher {
        Fetcher::new(&CrawlControls::default()).expect("client builds")
    }

    #[tokio::test(flavor = "current_thread")]
    async fn returns_body_on_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/wiki/France")
            .with_status(200)
            .with_body("<html>France</html>")
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/wiki/France", server.url())).expect("url parses");
        let body = fetcher().fetch_text(&url).await.expect("fetch succeeds");
        assert_eq!(body, "<html>France</html>");
        mock.assert_async().await;
    }

    #[tokio::test(flavor = "current_thread")]
    async fn non_success_status_is_a_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/wiki/Missing")
            .with_status(404)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/wiki/Missing", server.url())).expect("url parses");
        let err = fetcher().fetch_text(&url).await.expect_err("404 fails");
        assert!(matches!(err, FetchError::Request(_)));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn sends_the_fixed_browser_identity() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_header("user-agent", USER_AGENT)
            .with_body("ok")
            .create_async()
            .await;

        let url = Url::parse(&server.url()).expect("url parses");
        fetcher().fetch_text(&url).await.expect("fetch succeeds");
        mock.assert_async().await;
    }

    #[tokio::test(flavor = "current_thread")]
    async fn connection_refused_is_a_failure() {
        // Port 1 is essentially never listening.
        let url = Url::parse("http://127.0.0.1:1/").expect("url parses");
        let err = fetcher().fetch_text(&url).await.expect_err("refused");
        assert!(matches!(err, FetchError::Request(_)));
    }
}
