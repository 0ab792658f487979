use thiserror::Error;

/// User-facing text for a request that outlived its deadline.
pub const TIMEOUT_MESSAGE: &str = "Request timed out. Please try again.";

/// Fallback text when a failed response carries nothing readable.
pub const GENERIC_FAILURE_MESSAGE: &str = "Recommendation failed";

/// Transport-level failures raised by an [`HttpClient`](crate::http::HttpClient).
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Connection failed: {0}")]
    Connection(String),
}

/// Every way a call to the recommendation backend can go wrong.
///
/// The `Display` output is what the user sees. Callers past the client
/// boundary only get the string.
#[derive(Error, Debug)]
pub enum RecommendError {
    #[error(transparent)]
    Network(#[from] FetchError),

    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout,

    #[error("{message}")]
    HttpStatus { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    MalformedResponse(String),
}

impl From<serde_json::Error> for RecommendError {
    fn from(err: serde_json::Error) -> Self {
        RecommendError::MalformedResponse(err.to_string())
    }
}

impl RecommendError {
    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RecommendError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
