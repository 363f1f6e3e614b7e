//! Seam between the job runner and the comments API.

use async_trait::async_trait;
use youtube_client::{Comment, FetchSignals, YouTubeClient, YouTubeError};

/// Where the runner gets comments from.
///
/// Implemented by the real client below and by scripted mocks in
/// [`crate::testing`]. Implementations honor the same signal contract
/// as [`youtube_client::collect_comments`]: the cancel predicate is
/// polled before network work and the page callback may abort the fetch.
#[async_trait]
pub trait CommentSource: Send + Sync {
    async fn fetch(
        &self,
        video_id: &str,
        limit: usize,
        include_replies: bool,
        signals: &dyn FetchSignals,
    ) -> Result<Vec<Comment>, YouTubeError>;
}

#[async_trait]
impl CommentSource for YouTubeClient {
    async fn fetch(
        &self,
        video_id: &str,
        limit: usize,
        include_replies: bool,
        signals: &dyn FetchSignals,
    ) -> Result<Vec<Comment>, YouTubeError> {
        self.fetch_comments(video_id, limit, include_replies, signals)
            .await
    }
}
