//! Fetcher error types.

use thiserror::Error;

/// Errors that can occur while downloading the trending page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request failed or the body could not be read.
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}
