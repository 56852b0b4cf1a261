//! Redis cache module
//!
//! This module provides functionality for connecting to Redis and performing
//! basic key-value operations.

use anyhow::Result;
use redis::{AsyncCommands, Client, aio::MultiplexedConnection};
use serde::Deserialize;
use tracing::info;

/// Configuration for Redis connection
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL (e.g., "redis://localhost:6379/0")
    #[serde(default = "default_url")]
    pub url: String,
}

fn default_url() -> String {
    "redis://localhost:6379".to_string()
}

impl RedisConfig {
    /// Create a new RedisConfig from environment variables
    ///
    /// # Environment Variables
    /// - `REDIS_URL`: Redis connection URL (default: "redis://localhost:6379")
    pub fn from_env() -> Result<Self> {
        crate::settings::from_env("REDIS")
    }
}

/// Shared Redis connection
///
/// Wraps a multiplexed connection; clones share the same underlying
/// connection and are safe to use from concurrent tasks.
#[derive(Clone)]
pub struct RedisPool {
    connection: MultiplexedConnection,
}

impl RedisPool {
    /// Open the shared Redis connection
    pub async fn new(config: &RedisConfig) -> Result<Self> {
        let client = Client::open(config.url.clone())?;
        let connection = client.get_multiplexed_async_connection().await?;
        info!("Redis client initialized with URL: {}", config.url);
        Ok(RedisPool { connection })
    }

    /// Set a key-value pair in Redis, replacing any previous value
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    /// Get a value from Redis by key
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    /// Check if Redis is reachable
    pub async fn health_check(&self) -> Result<bool> {
        let mut conn = self.connection.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong == "PONG")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> RedisConfig {
        RedisConfig {
            url: "redis://localhost:6379".to_string(),
        }
    }

    #[tokio::test]
    #[ignore = "requires a running Redis on localhost:6379"]
    async fn test_redis_connection() -> Result<()> {
        let pool = RedisPool::new(&local_config()).await?;
        assert!(pool.health_check().await?);
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a running Redis on localhost:6379"]
    async fn test_set_replaces_value() -> Result<()> {
        let pool = RedisPool::new(&local_config()).await?;

        let key = "test_key";
        pool.set(key, "first").await?;
        pool.set(key, "second").await?;

        let retrieved = pool.get(key).await?;
        assert_eq!(retrieved, Some("second".to_string()));

        assert_eq!(pool.get("test_key_never_set").await?, None);

        Ok(())
    }
}
