//! Key-value storage seam for job records and the comment cache.
//!
//! The pipeline owns no durable state of its own: job status, progress,
//! results, cancellation flags and the comment cache all live behind
//! [`KvStore`], which only needs atomic per-key get / set-with-expiry.

mod memory;
mod redis;

pub use self::redis::RedisStore;
pub use memory::MemoryStore;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreError;

/// Binary-safe key-value store with per-key expiry.
///
/// Absence of a key is a miss, not an error.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Get the value at `key`, if present and not expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Set `key` to `value`, expiring after `ttl`.
    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError>;
}
