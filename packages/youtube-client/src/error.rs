//! Typed errors for the YouTube client.

use thiserror::Error;

/// Errors returned by comment fetch operations.
#[derive(Debug, Error)]
pub enum YouTubeError {
    /// Non-2xx response from the YouTube Data API. Fatal for the whole
    /// fetch; retry policy, if any, belongs to the caller.
    #[error("YouTube API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The fetch was cancelled between pages. No partial result is kept.
    #[error("fetch cancelled")]
    Cancelled,
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, YouTubeError>;
