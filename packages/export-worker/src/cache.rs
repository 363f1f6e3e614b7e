//! Read-through cache for fetched comment sets.
//!
//! Entries are zstd-compressed JSON keyed by the fetch-parameter
//! fingerprint. The cache transports opaque comment lists; nothing
//! invalidates an entry except TTL expiry or a different fingerprint.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use youtube_client::Comment;

use crate::error::JobError;
use crate::jobs::keys::{comments_cache_key, FetchParams};
use crate::store::KvStore;

const COMPRESSION_LEVEL: i32 = 6;

pub struct CommentCache {
    store: Arc<dyn KvStore>,
    ttl: Duration,
}

impl CommentCache {
    pub fn new(store: Arc<dyn KvStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Look up the cached comment set for `(video_id, params)`.
    ///
    /// Absence is a miss. A present entry that fails to decompress or
    /// parse is [`JobError::CacheCorruption`]; the caller decides whether
    /// that means refetch.
    pub async fn get(
        &self,
        video_id: &str,
        params: &FetchParams,
    ) -> Result<Option<Vec<Comment>>, JobError> {
        let key = comments_cache_key(video_id, params);
        let Some(compressed) = self.store.get(&key).await? else {
            return Ok(None);
        };
        let raw = zstd::decode_all(compressed.as_slice())
            .map_err(|e| JobError::CacheCorruption(e.to_string()))?;
        let comments: Vec<Comment> =
            serde_json::from_slice(&raw).map_err(|e| JobError::CacheCorruption(e.to_string()))?;
        debug!(video_id, key = %key, count = comments.len(), "comment cache hit");
        Ok(Some(comments))
    }

    /// Store a fetched comment set under its parameter fingerprint.
    pub async fn put(
        &self,
        video_id: &str,
        params: &FetchParams,
        comments: &[Comment],
    ) -> Result<(), JobError> {
        let key = comments_cache_key(video_id, params);
        let raw =
            serde_json::to_vec(comments).map_err(|e| JobError::Unexpected(e.to_string()))?;
        let compressed = zstd::encode_all(raw.as_slice(), COMPRESSION_LEVEL)
            .map_err(|e| JobError::Unexpected(e.to_string()))?;
        debug!(
            video_id,
            key = %key,
            raw_bytes = raw.len(),
            compressed_bytes = compressed.len(),
            "caching comment set"
        );
        self.store.set_ex(&key, &compressed, self.ttl).await?;
        Ok(())
    }
}
