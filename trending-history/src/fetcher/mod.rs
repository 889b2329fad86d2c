//! GitHub trending page download.
//!
//! [`TrendingFetcher`] downloads the page with a browser-like User-Agent and
//! [`parse_trending`] turns it into ranked [`TrendingRecord`]s.

mod error;
mod html;
mod parse;

pub use error::FetchError;
pub use parse::parse_trending;

use crate::snapshots::TrendingRecord;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::time::Duration;
use tracing::{info, info_span, Instrument};
use url::Url;

/// Default trending page.
pub const DEFAULT_TRENDING_URL: &str = "https://github.com/trending";

/// User-Agent sent with every request; GitHub serves a reduced page to unknown clients.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads and parses the trending page.
pub struct TrendingFetcher {
    client: reqwest::Client,
    url: Url,
}

impl TrendingFetcher {
    /// Creates a fetcher for the given trending page URL.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client can't be built.
    pub fn new(url: Url) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("text/html"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client, url })
    }

    /// The page this fetcher downloads.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Downloads the page and returns today's ranked records.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport failure or a non-success status.
    pub async fn fetch(&self) -> Result<Vec<TrendingRecord>, FetchError> {
        let span = info_span!("fetch_trending", url = %self.url);

        async {
            let page = self.download().await?;
            let records = parse_trending(&page);
            info!(count = records.len(), "Fetched trending repositories");
            Ok(records)
        }
        .instrument(span)
        .await
    }

    async fn download(&self) -> Result<String, FetchError> {
        let url = self.url.to_string();
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| FetchError::Http { url, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    const PAGE: &str = include_str!("../../tests/fixtures/trending.html");

    fn fetcher_for(server: &MockServer) -> TrendingFetcher {
        let url = Url::parse(&format!("{}/trending", server.uri())).unwrap();
        TrendingFetcher::new(url).unwrap()
    }

    #[tokio::test]
    async fn fetches_and_parses_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trending"))
            // The `header` matcher splits on commas, which this User-Agent contains.
            .and(|req: &Request| {
                req.headers
                    .get("user-agent")
                    .and_then(|value| value.to_str().ok())
                    == Some(BROWSER_USER_AGENT)
            })
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .expect(1)
            .mount(&server)
            .await;

        let records = fetcher_for(&server).fetch().await.unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "openai/gpt-4");
        assert_eq!(records[0].rank, 1);
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trending"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = fetcher_for(&server).fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 503, .. }));
    }
}
