//! Error types for the fetch and output stages.
//!
//! Fetch-stage errors never escape the paging loop: they end the loop and
//! are reported alongside whatever was gathered. Output-stage errors are the
//! only ones that reach `main`.

use thiserror::Error;

/// Why a single page request failed.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be completed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-success HTTP status.
    #[error("request failed with status {0}")]
    Status(u16),

    /// The envelope carried a non-zero `code`.
    #[error("feed returned code {code}: {message}")]
    Api { code: i64, message: String },

    /// The body was not the shape we expect.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// `true` for failures of the exchange itself, `false` for a reply we
    /// received but could not use.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Http(_) | FetchError::Status(_))
    }
}

/// Failure to persist the result document.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
