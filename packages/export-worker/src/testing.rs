//! Scripted mocks and fixtures for pipeline tests.
//!
//! Useful for testing the runner and its stages without making real
//! network calls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use youtube_client::{Comment, FetchSignals, YouTubeError};

use crate::source::CommentSource;

/// A scripted [`CommentSource`] serving canned comments.
///
/// Honors the same signal contract as the real client: the cancel
/// predicate is polled before the simulated fetch starts, and the page
/// callback runs once with the collected count.
pub struct MockCommentSource {
    comments: Vec<Comment>,
    error: Mutex<Option<YouTubeError>>,
    calls: AtomicUsize,
}

impl MockCommentSource {
    /// Serve `comments` (truncated to each fetch's limit).
    pub fn new(comments: Vec<Comment>) -> Self {
        Self {
            comments,
            error: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail the next fetch with `error` instead of returning comments.
    pub fn failing(error: YouTubeError) -> Self {
        Self {
            comments: Vec::new(),
            error: Mutex::new(Some(error)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of fetches that reached the (simulated) network.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommentSource for MockCommentSource {
    async fn fetch(
        &self,
        _video_id: &str,
        limit: usize,
        _include_replies: bool,
        signals: &dyn FetchSignals,
    ) -> Result<Vec<Comment>, YouTubeError> {
        if signals.is_cancelled().await {
            return Err(YouTubeError::Cancelled);
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.error.lock().unwrap().take() {
            return Err(err);
        }
        let mut comments = self.comments.clone();
        comments.truncate(limit);
        if signals.on_page(comments.len()).await.is_err() {
            return Err(YouTubeError::Cancelled);
        }
        Ok(comments)
    }
}

/// Build a comment fixture with sensible defaults.
pub fn comment(id: &str, text: &str) -> Comment {
    Comment {
        comment_id: id.to_owned(),
        parent_id: None,
        author: format!("author-{id}"),
        published_at: "2024-01-01T00:00:00Z".to_owned(),
        like_count: 0,
        text: text.to_owned(),
        reply_count: 0,
        video_id: "vid".to_owned(),
    }
}
