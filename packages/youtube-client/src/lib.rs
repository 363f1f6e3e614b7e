//! Pure YouTube Data API v3 comments client.
//!
//! A minimal client for the `commentThreads` and `comments` endpoints.
//! Fetches a video's comment thread page by page, normalizes threads and
//! replies into flat [`Comment`] records, and reports progress through
//! [`FetchSignals`] after every completed page.
//!
//! # Example
//!
//! ```rust,ignore
//! use youtube_client::{NoSignals, YouTubeClient};
//!
//! let client = YouTubeClient::new("your-api-key".into());
//!
//! let comments = client
//!     .fetch_comments("dQw4w9WgXcQ", 200, false, &NoSignals)
//!     .await?;
//! for comment in &comments {
//!     println!("{}: {}", comment.author, comment.text);
//! }
//! ```

pub mod error;
pub mod fetch;
pub mod link;
pub mod types;

pub use error::{Result, YouTubeError};
pub use fetch::{collect_comments, Cancelled, CommentsApi, FetchSignals, NoSignals, PAGE_SIZE};
pub use link::extract_video_id;
pub use types::Comment;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use types::{CommentThreadsPage, CommentsPage};

const BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

pub struct YouTubeClient {
    client: reqwest::Client,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", BASE_URL, endpoint);
        let resp = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(YouTubeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json().await?)
    }

    /// Fetch up to `limit` comments for a video end-to-end.
    ///
    /// Convenience wrapper around [`collect_comments`] with this client
    /// as the transport.
    pub async fn fetch_comments(
        &self,
        video_id: &str,
        limit: usize,
        include_replies: bool,
        signals: &dyn FetchSignals,
    ) -> Result<Vec<Comment>> {
        tracing::info!(video_id, limit, include_replies, "Starting comment fetch");
        let comments = collect_comments(self, video_id, limit, include_replies, signals).await?;
        tracing::info!(video_id, count = comments.len(), "Fetched comments");
        Ok(comments)
    }
}

#[async_trait]
impl CommentsApi for YouTubeClient {
    async fn thread_page(
        &self,
        video_id: &str,
        include_replies: bool,
        page_token: Option<&str>,
    ) -> Result<CommentThreadsPage> {
        let part = if include_replies { "snippet,replies" } else { "snippet" };
        let max_results = PAGE_SIZE.to_string();
        let mut params = vec![
            ("part", part),
            ("videoId", video_id),
            ("maxResults", max_results.as_str()),
            ("textFormat", "plainText"),
            ("order", "time"),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        tracing::debug!(video_id, page_token, "Requesting comment thread page");
        self.get_json("commentThreads", &params).await
    }

    async fn reply_page(
        &self,
        parent_id: &str,
        page_token: Option<&str>,
    ) -> Result<CommentsPage> {
        let max_results = PAGE_SIZE.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("parentId", parent_id),
            ("maxResults", max_results.as_str()),
            ("textFormat", "plainText"),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        tracing::debug!(parent_id, page_token, "Requesting reply page");
        self.get_json("comments", &params).await
    }
}
