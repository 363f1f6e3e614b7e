//! Redis-backed store implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use super::KvStore;
use crate::error::StoreError;

/// Redis-backed key-value store.
///
/// Uses a connection manager that reconnects automatically. Values are
/// stored as raw bytes; expiry maps to `SET ... EX`.
#[derive(Clone)]
pub struct RedisStore {
    conn: redis::aio::ConnectionManager,
}

impl RedisStore {
    /// Connect to the Redis instance at `redis_url`.
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url).map_err(StoreError::new)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(StoreError::new)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await.map_err(StoreError::new)?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs())
            .await
            .map_err(StoreError::new)
    }
}
