//! Error types for the query client.

use thiserror::Error;

/// Any failed or malformed response from the query API.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The request could not be sent or the body could not be read.
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The node answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The body was not the JSON shape we expected.
    #[error("Malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

impl NetworkError {
    /// URL of the failed request.
    pub fn url(&self) -> &str {
        match self {
            NetworkError::Request { url, .. }
            | NetworkError::Status { url, .. }
            | NetworkError::Malformed { url, .. } => url,
        }
    }
}
