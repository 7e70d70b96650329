//! Error types for the Spoonacular client.

/// Failure talking to the upstream recipe provider.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Network failure, timeout, or a 5xx from the provider.
    #[error("Spoonacular is unavailable: {0}")]
    Unavailable(String),
    /// The provider refused the request (4xx other than a missing recipe).
    #[error("Spoonacular rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// The requested recipe does not exist upstream.
    #[error("Recipe {0} not found")]
    NotFound(u64),
    /// The provider answered 2xx but the body could not be decoded.
    #[error("Failed to parse Spoonacular response")]
    ParseFailed {
        url: String,
        #[source]
        source: anyhow::Error,
    },
}

impl UpstreamError {
    /// Whether the failure says nothing about the request itself, i.e. a
    /// retry later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::ParseFailed { .. })
    }
}

impl From<reqwest_middleware::Error> for UpstreamError {
    fn from(err: reqwest_middleware::Error) -> Self {
        Self::Unavailable(without_url(err).to_string())
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        Self::Unavailable(err.without_url().to_string())
    }
}

/// Strip the request URL from a client error. Every upstream URL carries the
/// API key in its query string.
pub(crate) fn without_url(err: reqwest_middleware::Error) -> reqwest_middleware::Error {
    use reqwest_middleware::Error;
    match err {
        Error::Reqwest(e) => Error::Reqwest(e.without_url()),
        other => other,
    }
}
