//! Environment driven configuration
//!
//! Every service reads its configuration from environment variables grouped by
//! prefix (`DATABASE_*`, `REDIS_*`, `JWT_*`, ...). Each group deserializes into
//! its own struct; defaults live on the struct as serde defaults.

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::de::DeserializeOwned;

/// Load a configuration group from environment variables sharing `prefix`.
///
/// `DATABASE_MAX_CONNECTIONS` with prefix `DATABASE` becomes the
/// `max_connections` field.
pub fn from_env<T: DeserializeOwned>(prefix: &str) -> Result<T> {
    Config::builder()
        .add_source(Environment::with_prefix(prefix).try_parsing(true))
        .build()
        .and_then(|config| config.try_deserialize::<T>())
        .with_context(|| format!("invalid {}_* configuration", prefix))
}
