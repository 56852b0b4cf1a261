use anyhow::Result;
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig},
    settings,
    telemetry::{self, LogConfig},
};

mod error;
mod jwt;
mod models;
mod password;
mod repositories;
mod routes;
mod service;
mod session;
#[cfg(test)]
mod testing;
mod validation;

use crate::{
    jwt::{JwtConfig, TokenIssuer},
    password::PasswordHasher,
    repositories::UserRepository,
    service::AuthService,
    session::RedisSessionStore,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
}

/// Service-level settings read from `AUTH_*` variables
#[derive(Debug, Clone, Deserialize)]
struct ServiceConfig {
    #[serde(default = "default_bind_address")]
    bind_address: String,
    /// Login of the admin account created at start-up, if set
    admin_login: Option<String>,
    admin_password: Option<String>,
}

fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

fn main() -> Result<()> {
    let log_config = LogConfig::from_env()?;
    let dispatch = telemetry::build_dispatch(&log_config)?;
    let _guard = tracing::dispatcher::set_default(&dispatch);

    let runtime = telemetry::build_runtime(dispatch.clone())?;
    runtime.block_on(run())
}

async fn run() -> Result<()> {
    info!("Starting authentication service");

    let service_config: ServiceConfig = settings::from_env("AUTH")?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    // Initialize Redis connection
    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    if !redis_pool.health_check().await? {
        anyhow::bail!("Failed to connect to Redis");
    }

    let jwt_config = JwtConfig::from_env()?;
    let sessions = Arc::new(RedisSessionStore::new(redis_pool));
    let tokens = TokenIssuer::new(jwt_config, sessions);
    let credentials = Arc::new(UserRepository::new(pool));
    let auth_service = AuthService::new(credentials, PasswordHasher::default(), tokens);

    match (&service_config.admin_login, &service_config.admin_password) {
        (Some(login), Some(password)) => {
            if auth_service.ensure_admin(login, password).await? {
                info!("Created admin account {}", login);
            } else {
                info!("Admin account {} already exists", login);
            }
        }
        (None, None) => {}
        _ => warn!("AUTH_ADMIN_LOGIN and AUTH_ADMIN_PASSWORD must be set together; skipping admin bootstrap"),
    }

    info!("Authentication service initialized successfully");

    let app = routes::create_router(AppState { auth_service });

    let listener = TcpListener::bind(&service_config.bind_address).await?;
    info!(
        "Authentication service listening on {}",
        service_config.bind_address
    );

    axum::serve(listener, app).await?;

    Ok(())
}
