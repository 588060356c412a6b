use thiserror::Error;

/// Failure of a single call to the language-analysis service.
///
/// These never abort an audit: the runner turns each one into a scored
/// finding so the report stays complete.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("API not available")]
    MissingCredential,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Empty response from analysis service")]
    EmptyResponse,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::Request(err.to_string())
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::MalformedResponse(err.to_string())
    }
}

/// Failure to load the audited page. Fatal to the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Page request failed (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Expected element '{selector}' never appeared on {url}")]
    MissingElement { url: String, selector: String },

    #[error("Invalid wait-for selector '{0}'")]
    InvalidSelector(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}
