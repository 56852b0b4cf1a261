//! Sign-up, sign-in and token refresh

use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    error::{AuthError, AuthResult},
    jwt::{IssuedToken, SessionPair, TokenIssuer},
    models::CredentialRecord,
    password::PasswordHasher,
    repositories::CredentialStore,
    validation::{validate_sign_in, validate_sign_up},
};

/// Result of a successful sign-in
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user_id: Uuid,
    pub tokens: SessionPair,
}

/// Orchestrates the credential store, the password hasher and the token issuer
#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            credentials,
            hasher,
            tokens,
        }
    }

    /// Register a regular user
    pub async fn sign_up(&self, login: &str, password: &str) -> AuthResult<Uuid> {
        validate_sign_up(login, password).map_err(AuthError::Validation)?;
        self.register(login, password, false).await
    }

    /// Check credentials and open a new session, revoking any previous
    /// refresh token of the user
    pub async fn sign_in(&self, login: &str, password: &str) -> AuthResult<SignedIn> {
        validate_sign_in(login, password).map_err(AuthError::Validation)?;

        let record = match self.credentials.find_by_login(login).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!("Sign-in attempt for unknown login: {}", login);
                return Err(AuthError::WrongCredentials);
            }
            Err(e) => {
                error!("Failed to look up login {}: {}", login, e);
                return Err(AuthError::WrongCredentials);
            }
        };

        if !self.hasher.verify(password, &record.password_hash) {
            warn!("Wrong password for login: {}", login);
            return Err(AuthError::WrongCredentials);
        }

        let tokens = self
            .tokens
            .issue_session_pair(&record.user_id.to_string(), record.is_admin)
            .await?;

        info!("User signed in: {}", record.user_id);
        Ok(SignedIn {
            user_id: record.user_id,
            tokens,
        })
    }

    /// Exchange a live refresh token for a new access token
    pub async fn refresh(&self, user_id: &str, refresh_token: &str) -> AuthResult<IssuedToken> {
        self.tokens.rotate_access(user_id, refresh_token).await
    }

    /// Register the admin account if its login is free.
    ///
    /// Returns `false` when the login already exists; the existing account is
    /// left as it is.
    pub async fn ensure_admin(&self, login: &str, password: &str) -> AuthResult<bool> {
        validate_sign_up(login, password).map_err(AuthError::Validation)?;
        match self.register(login, password, true).await {
            Ok(_) => Ok(true),
            Err(AuthError::LoginTaken) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn register(&self, login: &str, password: &str, is_admin: bool) -> AuthResult<Uuid> {
        let password_hash = self.hasher.hash(password)?;
        let record = CredentialRecord::new(login, password_hash).with_admin(is_admin);

        match self.credentials.insert(&record).await {
            Ok(()) => {
                info!("Registered user {} as {}", login, record.user_id);
                Ok(record.user_id)
            }
            Err(e) if e.is_constraint() => Err(AuthError::LoginTaken),
            Err(e) => Err(AuthError::Database(e)),
        }
    }
}
