//! In-memory stores and fixtures for unit tests

use anyhow::{Result, bail};
use argon2::Params;
use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

use crate::{
    jwt::{JwtConfig, TokenIssuer},
    models::CredentialRecord,
    password::PasswordHasher,
    repositories::CredentialStore,
    service::AuthService,
    session::SessionStore,
};

/// Argon2id with minimal cost so tests stay fast
pub fn fast_hasher() -> PasswordHasher {
    PasswordHasher::new(Params::new(8, 1, 1, None).unwrap())
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: "test-access-secret".to_string(),
        refresh_secret: "test-refresh-secret".to_string(),
        access_token_expiry: 900,
        refresh_token_expiry: 604800,
    }
}

#[derive(Default)]
pub struct InMemoryCredentialStore {
    records: Mutex<HashMap<String, CredentialRecord>>,
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn insert(&self, record: &CredentialRecord) -> DatabaseResult<()> {
        let mut records = self.records.lock().await;
        if records.contains_key(&record.login) {
            return Err(DatabaseError::Constraint(format!(
                "login {} already exists",
                record.login
            )));
        }
        records.insert(record.login.clone(), record.clone());
        Ok(())
    }

    async fn find_by_login(&self, login: &str) -> DatabaseResult<Option<CredentialRecord>> {
        Ok(self.records.lock().await.get(login).cloned())
    }
}

#[derive(Default)]
pub struct InMemorySessionStore {
    values: Mutex<HashMap<String, String>>,
    unavailable: bool,
}

impl InMemorySessionStore {
    /// A store whose every operation fails
    pub fn failing() -> Self {
        Self {
            values: Mutex::default(),
            unavailable: true,
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.unavailable {
            bail!("session store unavailable");
        }
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.unavailable {
            bail!("session store unavailable");
        }
        Ok(self.values.lock().await.get(key).cloned())
    }
}

/// Service wired to fresh in-memory stores
pub fn test_service() -> (AuthService, Arc<InMemoryCredentialStore>, Arc<InMemorySessionStore>) {
    let credentials = Arc::new(InMemoryCredentialStore::default());
    let sessions = Arc::new(InMemorySessionStore::default());
    let tokens = TokenIssuer::new(test_jwt_config(), sessions.clone());
    let service = AuthService::new(credentials.clone(), fast_hasher(), tokens);
    (service, credentials, sessions)
}
