//! Typed errors for the export job pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so the runner can
//! classify failures into a persisted job status plus a short
//! human-readable message.

use thiserror::Error;

/// Errors that can occur while executing an export job.
#[derive(Debug, Error)]
pub enum JobError {
    /// Non-2xx response from the comments API. Fatal for the job.
    #[error("YouTube API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The job was cancelled at a checkpoint. A normal terminal path,
    /// not a failure.
    #[error("job cancelled")]
    Cancelled,

    /// Export write failure.
    #[error("export I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cached payload failed to decompress or parse. Callers treat this
    /// as a cache miss and refetch; it is never fatal on its own.
    #[error("corrupted cache entry: {0}")]
    CacheCorruption(String),

    /// Key-value store operation failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Any other failure, message kept verbatim for diagnostics.
    #[error("{0}")]
    Unexpected(String),
}

impl JobError {
    /// Short human-readable form persisted to the progress record.
    /// Never a stack trace or a raw response body.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { status, .. } => format!("YouTube API error {status}"),
            Self::Cancelled => "cancelled".to_owned(),
            Self::Io(err) => format!("export failed: {}", err.kind()),
            Self::CacheCorruption(_) => "cache entry could not be read".to_owned(),
            Self::Store(_) => "storage unavailable".to_owned(),
            Self::Unexpected(message) => message.clone(),
        }
    }
}

impl From<youtube_client::YouTubeError> for JobError {
    fn from(err: youtube_client::YouTubeError) -> Self {
        match err {
            youtube_client::YouTubeError::Api { status, body } => Self::Api { status, body },
            youtube_client::YouTubeError::Cancelled => Self::Cancelled,
            youtube_client::YouTubeError::Http(err) => Self::Unexpected(err.to_string()),
        }
    }
}

/// Key-value store backend error.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StoreError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

impl StoreError {
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Box::new(err))
    }
}
