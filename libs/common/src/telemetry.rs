//! Logging setup
//!
//! Services build a [`Dispatch`] from their [`LogConfig`] and hand it to
//! [`build_runtime`]. The dispatcher is installed as the thread-local default
//! on the runtime's own threads; nothing is registered process-wide.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs::OpenOptions, path::PathBuf, sync::Mutex};
use tokio::runtime::{Builder, Runtime};
use tracing::Dispatch;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt};

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Level filter (e.g. "info", "auth=debug,sqlx=warn"); `RUST_LOG` wins when set
    #[serde(default = "default_level")]
    pub level: String,
    /// Optional file that receives a copy of every event
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

impl LogConfig {
    /// # Environment Variables
    /// - `LOG_LEVEL`: level filter (default: "info")
    /// - `LOG_FILE`: path of a log file to append to (default: none)
    pub fn from_env() -> Result<Self> {
        crate::settings::from_env("LOG")
    }
}

/// Build the dispatcher described by `config`
pub fn build_dispatch(config: &LogConfig) -> Result<Dispatch> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("invalid log level filter: {}", config.level))?;

    let file_layer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .boxed(),
            )
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer);

    Ok(Dispatch::new(subscriber))
}

/// Build a multi-threaded Tokio runtime whose threads log through `dispatch`
pub fn build_runtime(dispatch: Dispatch) -> Result<Runtime> {
    Builder::new_multi_thread()
        .enable_all()
        .on_thread_start(move || {
            // Runtime threads live as long as the runtime, so the guard is
            // never restored.
            std::mem::forget(tracing::dispatcher::set_default(&dispatch));
        })
        .build()
        .context("failed to build Tokio runtime")
}
