use serde::{Deserialize, Serialize};

/// One page of the `commentThreads` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentThreadsPage {
    #[serde(default)]
    pub items: Vec<CommentThread>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// A top-level comment thread: the top-level comment plus any replies
/// the API chose to inline into the page.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentThread {
    pub id: Option<String>,
    pub snippet: Option<ThreadSnippet>,
    pub replies: Option<ReplyList>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreadSnippet {
    #[serde(rename = "topLevelComment")]
    pub top_level_comment: Option<CommentItem>,
    #[serde(rename = "totalReplyCount", default)]
    pub total_reply_count: u64,
}

/// Replies inlined into a thread. The API does not guarantee all of a
/// thread's replies appear here; `total_reply_count` is authoritative.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplyList {
    #[serde(default)]
    pub comments: Vec<CommentItem>,
}

/// One page of the `comments` endpoint (replies to a parent comment).
#[derive(Debug, Clone, Deserialize)]
pub struct CommentsPage {
    #[serde(default)]
    pub items: Vec<CommentItem>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// A single raw comment resource.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentItem {
    pub id: Option<String>,
    pub snippet: Option<CommentSnippet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentSnippet {
    #[serde(rename = "authorDisplayName")]
    pub author_display_name: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    #[serde(rename = "likeCount", default)]
    pub like_count: u64,
    #[serde(rename = "textDisplay")]
    pub text_display: Option<String>,
    #[serde(rename = "textOriginal")]
    pub text_original: Option<String>,
}

/// A normalized comment record, flattened out of the thread/reply shapes
/// the API returns. Immutable once fetched.
///
/// `published_at` is kept as the API's ISO-8601 string; it is zero-padded
/// and therefore sorts correctly as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: String,
    /// Id of the parent top-level comment; `None` for top-level comments.
    pub parent_id: Option<String>,
    pub author: String,
    pub published_at: String,
    pub like_count: u64,
    pub text: String,
    pub reply_count: u64,
    pub video_id: String,
}

impl Comment {
    /// Normalize a raw comment resource. Missing snippet fields become
    /// empty strings / zero; `text_display` wins over `text_original`
    /// unless blank.
    pub(crate) fn from_item(
        item: &CommentItem,
        video_id: &str,
        parent_id: Option<&str>,
        reply_count: u64,
    ) -> Self {
        let snippet = item.snippet.clone().unwrap_or_default();
        let text = snippet
            .text_display
            .filter(|t| !t.is_empty())
            .or(snippet.text_original.filter(|t| !t.is_empty()))
            .unwrap_or_default();
        Self {
            comment_id: item.id.clone().unwrap_or_default(),
            parent_id: parent_id.map(str::to_owned),
            author: snippet.author_display_name.unwrap_or_default(),
            published_at: snippet.published_at.unwrap_or_default(),
            like_count: snippet.like_count,
            text,
            reply_count,
            video_id: video_id.to_owned(),
        }
    }
}
