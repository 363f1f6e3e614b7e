//! Pagination loop that flattens comment thread pages into an ordered
//! list of normalized [`Comment`] records.
//!
//! The loop is written against the [`CommentsApi`] transport seam so the
//! collection logic (continuation tokens, reply top-up, limit handling,
//! cancellation) can be exercised without a network.

use async_trait::async_trait;

use crate::error::{Result, YouTubeError};
use crate::types::{Comment, CommentThreadsPage, CommentsPage};

/// Page size requested from both paginated endpoints.
pub const PAGE_SIZE: u32 = 100;

/// Transport seam over the two paginated endpoints the collector uses.
#[async_trait]
pub trait CommentsApi: Send + Sync {
    /// Fetch one page of top-level comment threads for a video.
    async fn thread_page(
        &self,
        video_id: &str,
        include_replies: bool,
        page_token: Option<&str>,
    ) -> Result<CommentThreadsPage>;

    /// Fetch one page of replies to a parent comment.
    async fn reply_page(&self, parent_id: &str, page_token: Option<&str>)
        -> Result<CommentsPage>;
}

/// Marker returned by [`FetchSignals::on_page`] to abort a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Progress and cancellation signals observed during a fetch.
///
/// `on_page` runs once per completed thread page with the running
/// collected count; returning `Err(Cancelled)` aborts the fetch.
/// `is_cancelled` is polled before every network call. Cancellation is
/// cooperative: a request already in flight is never interrupted.
#[async_trait]
pub trait FetchSignals: Send + Sync {
    async fn on_page(&self, collected: usize) -> std::result::Result<(), Cancelled>;

    async fn is_cancelled(&self) -> bool;
}

/// Signals that never cancel and discard progress.
pub struct NoSignals;

#[async_trait]
impl FetchSignals for NoSignals {
    async fn on_page(&self, _collected: usize) -> std::result::Result<(), Cancelled> {
        Ok(())
    }

    async fn is_cancelled(&self) -> bool {
        false
    }
}

/// Collect up to `limit` comments for `video_id`, in page order.
///
/// Each thread emits its normalized top-level comment first; with
/// `include_replies`, the replies inlined into the page follow it, and
/// when the thread reports more replies than were inlined the remainder
/// is paged in from the replies endpoint. A reply's `parent_id` always
/// references an already-emitted comment.
///
/// Collection stops the moment `limit` is reached; excess comments from
/// the final page are discarded and no further pages are requested.
/// Cancellation yields `YouTubeError::Cancelled` with no partial result.
pub async fn collect_comments(
    api: &dyn CommentsApi,
    video_id: &str,
    limit: usize,
    include_replies: bool,
    signals: &dyn FetchSignals,
) -> Result<Vec<Comment>> {
    let mut collected: Vec<Comment> = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        if signals.is_cancelled().await {
            return Err(YouTubeError::Cancelled);
        }
        let page = api
            .thread_page(video_id, include_replies, page_token.as_deref())
            .await?;

        for thread in &page.items {
            let Some(snippet) = &thread.snippet else {
                continue;
            };
            let Some(top) = &snippet.top_level_comment else {
                continue;
            };
            let top_id = top.id.clone().unwrap_or_default();

            collected.push(Comment::from_item(
                top,
                video_id,
                None,
                snippet.total_reply_count,
            ));
            if collected.len() >= limit {
                collected.truncate(limit);
                return Ok(collected);
            }

            if include_replies {
                let inline = thread
                    .replies
                    .as_ref()
                    .map(|r| r.comments.as_slice())
                    .unwrap_or_default();
                for reply in inline {
                    collected.push(Comment::from_item(reply, video_id, Some(&top_id), 0));
                    if collected.len() >= limit {
                        collected.truncate(limit);
                        return Ok(collected);
                    }
                }
                if snippet.total_reply_count > inline.len() as u64 {
                    collect_replies(api, video_id, &top_id, limit, &mut collected, signals)
                        .await?;
                    if collected.len() >= limit {
                        return Ok(collected);
                    }
                }
            }
        }

        if signals.on_page(collected.len()).await.is_err() {
            return Err(YouTubeError::Cancelled);
        }

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(collected)
}

/// Page through the replies endpoint for one parent until exhausted or
/// `limit` is reached.
async fn collect_replies(
    api: &dyn CommentsApi,
    video_id: &str,
    parent_id: &str,
    limit: usize,
    collected: &mut Vec<Comment>,
    signals: &dyn FetchSignals,
) -> Result<()> {
    let mut page_token: Option<String> = None;
    loop {
        if signals.is_cancelled().await {
            return Err(YouTubeError::Cancelled);
        }
        let page = api.reply_page(parent_id, page_token.as_deref()).await?;
        for reply in &page.items {
            collected.push(Comment::from_item(reply, video_id, Some(parent_id), 0));
            if collected.len() >= limit {
                return Ok(());
            }
        }
        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::types::{CommentItem, CommentSnippet, CommentThread, ReplyList, ThreadSnippet};

    fn item(id: &str, text: &str) -> CommentItem {
        CommentItem {
            id: Some(id.to_owned()),
            snippet: Some(CommentSnippet {
                author_display_name: Some(format!("author-{id}")),
                published_at: Some("2024-01-01T00:00:00Z".to_owned()),
                like_count: 0,
                text_display: Some(text.to_owned()),
                text_original: None,
            }),
        }
    }

    fn thread(id: &str, text: &str) -> CommentThread {
        thread_with_replies(id, text, 0, Vec::new())
    }

    fn thread_with_replies(
        id: &str,
        text: &str,
        total_reply_count: u64,
        inline: Vec<CommentItem>,
    ) -> CommentThread {
        CommentThread {
            id: Some(id.to_owned()),
            snippet: Some(ThreadSnippet {
                top_level_comment: Some(item(id, text)),
                total_reply_count,
            }),
            replies: if inline.is_empty() {
                None
            } else {
                Some(ReplyList { comments: inline })
            },
        }
    }

    /// Scripted transport: thread pages indexed by continuation token,
    /// reply pages keyed by parent id. Counts every request.
    struct FakeApi {
        thread_pages: Vec<CommentThreadsPage>,
        reply_pages: HashMap<String, Vec<CommentsPage>>,
        thread_calls: AtomicUsize,
        reply_calls: AtomicUsize,
        fail_with: Mutex<Option<YouTubeError>>,
    }

    impl FakeApi {
        fn new(thread_pages: Vec<CommentThreadsPage>) -> Self {
            Self {
                thread_pages,
                reply_pages: HashMap::new(),
                thread_calls: AtomicUsize::new(0),
                reply_calls: AtomicUsize::new(0),
                fail_with: Mutex::new(None),
            }
        }

        fn failing(err: YouTubeError) -> Self {
            let mut api = Self::new(Vec::new());
            api.fail_with = Mutex::new(Some(err));
            api
        }
    }

    #[async_trait]
    impl CommentsApi for FakeApi {
        async fn thread_page(
            &self,
            _video_id: &str,
            _include_replies: bool,
            page_token: Option<&str>,
        ) -> Result<CommentThreadsPage> {
            if let Some(err) = self.fail_with.lock().unwrap().take() {
                return Err(err);
            }
            self.thread_calls.fetch_add(1, Ordering::SeqCst);
            let index = match page_token {
                None => 0,
                Some(token) => token
                    .strip_prefix('p')
                    .and_then(|n| n.parse::<usize>().ok())
                    .expect("fake page token"),
            };
            Ok(self.thread_pages[index].clone())
        }

        async fn reply_page(
            &self,
            parent_id: &str,
            page_token: Option<&str>,
        ) -> Result<CommentsPage> {
            self.reply_calls.fetch_add(1, Ordering::SeqCst);
            let pages = &self.reply_pages[parent_id];
            let index = match page_token {
                None => 0,
                Some(token) => token
                    .strip_prefix('r')
                    .and_then(|n| n.parse::<usize>().ok())
                    .expect("fake reply token"),
            };
            Ok(pages[index].clone())
        }
    }

    /// Cancels once `on_page` has been observed `after_pages` times.
    struct CancelAfterPages {
        after_pages: usize,
        seen: AtomicUsize,
    }

    #[async_trait]
    impl FetchSignals for CancelAfterPages {
        async fn on_page(&self, _collected: usize) -> std::result::Result<(), Cancelled> {
            if self.seen.fetch_add(1, Ordering::SeqCst) + 1 >= self.after_pages {
                return Err(Cancelled);
            }
            Ok(())
        }

        async fn is_cancelled(&self) -> bool {
            self.seen.load(Ordering::SeqCst) >= self.after_pages
        }
    }

    struct AlwaysCancelled;

    #[async_trait]
    impl FetchSignals for AlwaysCancelled {
        async fn on_page(&self, _collected: usize) -> std::result::Result<(), Cancelled> {
            Err(Cancelled)
        }

        async fn is_cancelled(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn limit_stops_mid_page_and_requests_no_further_pages() {
        // 5 top-level comments across 2 pages; a third page exists but
        // must never be requested once the limit is hit.
        let api = FakeApi::new(vec![
            CommentThreadsPage {
                items: vec![thread("c1", "one"), thread("c2", "two")],
                next_page_token: Some("p1".to_owned()),
            },
            CommentThreadsPage {
                items: vec![thread("c3", "three"), thread("c4", "four"), thread("c5", "five")],
                next_page_token: Some("p2".to_owned()),
            },
            CommentThreadsPage {
                items: vec![thread("c6", "six")],
                next_page_token: None,
            },
        ]);

        let comments = collect_comments(&api, "dQw4w9WgXcQ", 3, false, &NoSignals)
            .await
            .unwrap();

        assert_eq!(comments.len(), 3);
        let ids: Vec<&str> = comments.iter().map(|c| c.comment_id.as_str()).collect();
        assert_eq!(ids, ["c1", "c2", "c3"]);
        assert_eq!(api.thread_calls.load(Ordering::SeqCst), 2);
        assert!(comments.iter().all(|c| c.video_id == "dQw4w9WgXcQ"));
    }

    #[tokio::test]
    async fn short_upstream_returns_everything_below_limit() {
        let api = FakeApi::new(vec![CommentThreadsPage {
            items: vec![thread("c1", "one"), thread("c2", "two")],
            next_page_token: None,
        }]);

        let comments = collect_comments(&api, "vid", 50, false, &NoSignals)
            .await
            .unwrap();

        assert_eq!(comments.len(), 2);
    }

    #[tokio::test]
    async fn replies_follow_their_parent_in_order() {
        let mut api = FakeApi::new(vec![CommentThreadsPage {
            items: vec![
                thread_with_replies("c1", "parent", 3, vec![item("r1", "inline reply")]),
                thread("c2", "second"),
            ],
            next_page_token: None,
        }]);
        api.reply_pages.insert(
            "c1".to_owned(),
            vec![
                CommentsPage {
                    items: vec![item("r2", "late reply")],
                    next_page_token: Some("r1".to_owned()),
                },
                CommentsPage {
                    items: vec![item("r3", "later reply")],
                    next_page_token: None,
                },
            ],
        );

        let comments = collect_comments(&api, "vid", 50, true, &NoSignals)
            .await
            .unwrap();

        let ids: Vec<&str> = comments.iter().map(|c| c.comment_id.as_str()).collect();
        assert_eq!(ids, ["c1", "r1", "r2", "r3", "c2"]);
        assert_eq!(comments[0].parent_id, None);
        assert_eq!(comments[0].reply_count, 3);
        for reply in &comments[1..4] {
            assert_eq!(reply.parent_id.as_deref(), Some("c1"));
        }
        assert_eq!(api.reply_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn replies_are_skipped_without_include_replies() {
        let api = FakeApi::new(vec![CommentThreadsPage {
            items: vec![thread_with_replies(
                "c1",
                "parent",
                2,
                vec![item("r1", "inline")],
            )],
            next_page_token: None,
        }]);

        let comments = collect_comments(&api, "vid", 50, false, &NoSignals)
            .await
            .unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(api.reply_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancellation_before_first_call_fetches_nothing() {
        let api = FakeApi::new(vec![CommentThreadsPage {
            items: vec![thread("c1", "one")],
            next_page_token: None,
        }]);

        let err = collect_comments(&api, "vid", 10, false, &AlwaysCancelled)
            .await
            .unwrap_err();

        assert!(matches!(err, YouTubeError::Cancelled));
        assert_eq!(api.thread_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancellation_from_page_callback_aborts_between_pages() {
        let api = FakeApi::new(vec![
            CommentThreadsPage {
                items: vec![thread("c1", "one")],
                next_page_token: Some("p1".to_owned()),
            },
            CommentThreadsPage {
                items: vec![thread("c2", "two")],
                next_page_token: None,
            },
        ]);
        let signals = CancelAfterPages {
            after_pages: 1,
            seen: AtomicUsize::new(0),
        };

        let err = collect_comments(&api, "vid", 10, false, &signals)
            .await
            .unwrap_err();

        assert!(matches!(err, YouTubeError::Cancelled));
        assert_eq!(api.thread_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn api_error_is_fatal() {
        let api = FakeApi::failing(YouTubeError::Api {
            status: 403,
            body: "quota exceeded".to_owned(),
        });

        let err = collect_comments(&api, "vid", 10, false, &NoSignals)
            .await
            .unwrap_err();

        match err {
            YouTubeError::Api { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn text_display_falls_back_to_text_original() {
        let mut blank = item("c1", "");
        blank.snippet.as_mut().unwrap().text_original = Some("original text".to_owned());
        let api = FakeApi::new(vec![CommentThreadsPage {
            items: vec![CommentThread {
                id: Some("c1".to_owned()),
                snippet: Some(ThreadSnippet {
                    top_level_comment: Some(blank),
                    total_reply_count: 0,
                }),
                replies: None,
            }],
            next_page_token: None,
        }]);

        let comments = collect_comments(&api, "vid", 10, false, &NoSignals)
            .await
            .unwrap();

        assert_eq!(comments[0].text, "original text");
    }
}
