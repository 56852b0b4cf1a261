//! Credential store backed by PostgreSQL

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row};
use tracing::info;

use crate::models::CredentialRecord;

/// Persistent mapping from login to credentials
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new record. A login that is already registered yields
    /// [`DatabaseError::Constraint`] and leaves the existing record untouched.
    async fn insert(&self, record: &CredentialRecord) -> DatabaseResult<()>;

    /// Look up a record by its exact login
    async fn find_by_login(&self, login: &str) -> DatabaseResult<Option<CredentialRecord>>;
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn insert(&self, record: &CredentialRecord) -> DatabaseResult<()> {
        info!("Creating new user: {}", record.login);

        let result = sqlx::query(
            r#"
            INSERT INTO users (user_id, login, password_hash, is_admin)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (login) DO NOTHING
            "#,
        )
        .bind(record.user_id)
        .bind(&record.login)
        .bind(&record.password_hash)
        .bind(record.is_admin)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::Constraint(format!(
                "login {} already exists",
                record.login
            )));
        }

        Ok(())
    }

    async fn find_by_login(&self, login: &str) -> DatabaseResult<Option<CredentialRecord>> {
        info!("Finding user by login: {}", login);

        let row = sqlx::query(
            r#"
            SELECT user_id, login, password_hash, is_admin
            FROM users
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        match row {
            Some(row) => {
                let record = CredentialRecord {
                    user_id: row.try_get("user_id").map_err(DatabaseError::Query)?,
                    login: row.try_get("login").map_err(DatabaseError::Query)?,
                    password_hash: row.try_get("password_hash").map_err(DatabaseError::Query)?,
                    is_admin: row.try_get("is_admin").map_err(DatabaseError::Query)?,
                };
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}
