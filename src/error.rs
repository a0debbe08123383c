// Error types for reposcout.
// Covers GitHub API failures, provider error payloads, and cache I/O.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    /// The provider answered without a result list; carries its message verbatim.
    #[error("{message}")]
    Search { message: String },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ScoutError>;
