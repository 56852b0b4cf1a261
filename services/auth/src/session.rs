//! Refresh token sessions
//!
//! Each user has at most one live refresh token, stored under a key derived
//! from the user identity. Writing a new one replaces the old one, which is how
//! earlier refresh tokens get revoked. Entries carry no TTL; the token's own
//! expiration claim bounds its lifetime.

use anyhow::Result;
use async_trait::async_trait;
use common::cache::RedisPool;
use tracing::debug;

/// Key under which a user's current refresh token is stored
pub fn session_key(user_id: &str) -> String {
    format!("refresh-token-{}", user_id)
}

/// Key-value store for refresh token sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Current value under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<String>>;
}

/// Session store backed by Redis
#[derive(Clone)]
pub struct RedisSessionStore {
    redis_pool: RedisPool,
}

impl RedisSessionStore {
    pub fn new(redis_pool: RedisPool) -> Self {
        Self { redis_pool }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        debug!("Storing session under {}", key);
        self.redis_pool.set(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        debug!("Loading session under {}", key);
        self.redis_pool.get(key).await
    }
}
