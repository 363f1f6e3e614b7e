//! Key derivation for job records and the comment cache.
//!
//! Job records live at fixed keys derived from the job id. The cache key
//! carries a fingerprint of the fetch parameters, so different parameter
//! sets map to different entries and never collide.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hex characters of the digest embedded in cache keys.
const FINGERPRINT_LEN: usize = 16;

pub fn job_status_key(job_id: &str) -> String {
    format!("job:{job_id}:status")
}

pub fn job_progress_key(job_id: &str) -> String {
    format!("job:{job_id}:progress")
}

pub fn job_result_key(job_id: &str) -> String {
    format!("job:{job_id}:result")
}

pub fn job_cancel_key(job_id: &str) -> String {
    format!("job:{job_id}:cancel")
}

/// Parameters that shape a fetch, canonicalized into the cache
/// fingerprint. Settings applied after the fetch (filters, sort, format,
/// field selection) are deliberately excluded: they must not fragment
/// the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FetchParams {
    pub include_replies: bool,
    pub limit: u32,
}

/// Stable fingerprint over the canonical parameter encoding.
///
/// The encoding serializes the fields of [`FetchParams`] in their fixed
/// declaration order, so the fingerprint is independent of how the
/// parameters were assembled.
pub fn fingerprint(params: &FetchParams) -> String {
    let canonical = serde_json::to_string(params).expect("fetch params serialize");
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..FINGERPRINT_LEN].to_owned()
}

/// Cache key for a video's fetched comment set.
pub fn comments_cache_key(video_id: &str, params: &FetchParams) -> String {
    format!("yt:comments:{video_id}:{}", fingerprint(params))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_keys_embed_the_job_id() {
        assert_eq!(job_status_key("j1"), "job:j1:status");
        assert_eq!(job_progress_key("j1"), "job:j1:progress");
        assert_eq!(job_result_key("j1"), "job:j1:result");
        assert_eq!(job_cancel_key("j1"), "job:j1:cancel");
    }

    #[test]
    fn fingerprint_is_stable() {
        let params = FetchParams {
            include_replies: true,
            limit: 200,
        };
        assert_eq!(fingerprint(&params), fingerprint(&params));
        assert_eq!(fingerprint(&params).len(), FINGERPRINT_LEN);
    }

    #[test]
    fn fingerprint_changes_with_parameters() {
        let base = FetchParams {
            include_replies: false,
            limit: 200,
        };
        let more = FetchParams { limit: 500, ..base };
        let replies = FetchParams {
            include_replies: true,
            ..base
        };
        assert_ne!(fingerprint(&base), fingerprint(&more));
        assert_ne!(fingerprint(&base), fingerprint(&replies));
    }

    #[test]
    fn cache_key_separates_videos_and_parameters() {
        let params = FetchParams {
            include_replies: false,
            limit: 200,
        };
        let key = comments_cache_key("dQw4w9WgXcQ", &params);
        assert!(key.starts_with("yt:comments:dQw4w9WgXcQ:"));
        assert_ne!(key, comments_cache_key("otherVideo0", &params));
    }
}
