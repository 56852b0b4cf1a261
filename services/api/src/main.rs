use anyhow::Result;
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use common::{
    database::{self, DatabaseConfig},
    settings,
    telemetry::{self, LogConfig},
    token::AccessTokenVerifier,
};

mod error;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;
#[cfg(test)]
mod testing;
mod validation;

use crate::{
    repositories::{ActorRepository, FilmRepository},
    state::AppState,
};

/// Service-level settings read from `API_*` variables
#[derive(Debug, Clone, Deserialize)]
struct ServiceConfig {
    #[serde(default = "default_bind_address")]
    bind_address: String,
}

fn default_bind_address() -> String {
    "0.0.0.0:3001".to_string()
}

/// The only JWT setting this service needs; other `JWT_*` variables are ignored
#[derive(Deserialize)]
struct AccessSecret {
    access_secret: String,
}

fn main() -> Result<()> {
    let log_config = LogConfig::from_env()?;
    let dispatch = telemetry::build_dispatch(&log_config)?;
    let _guard = tracing::dispatcher::set_default(&dispatch);

    let runtime = telemetry::build_runtime(dispatch.clone())?;
    runtime.block_on(run())
}

async fn run() -> Result<()> {
    info!("Starting API service");

    let service_config: ServiceConfig = settings::from_env("API")?;
    let jwt: AccessSecret = settings::from_env("JWT")?;
    if jwt.access_secret.is_empty() {
        anyhow::bail!("JWT_ACCESS_SECRET must not be empty");
    }

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    let app_state = AppState {
        actors: Arc::new(ActorRepository::new(pool.clone())),
        films: Arc::new(FilmRepository::new(pool)),
        verifier: AccessTokenVerifier::new(&jwt.access_secret),
    };

    info!("API service initialized successfully");

    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&service_config.bind_address).await?;
    info!("API service listening on {}", service_config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
