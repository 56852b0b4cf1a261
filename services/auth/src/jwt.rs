//! Token issuing, verification and rotation
//!
//! Access tokens are HS256 JWTs signed with the access secret and carry the
//! user identity and admin flag. Refresh tokens are signed with a separate
//! secret, carry only the admin flag, and are valid only while they are the
//! value stored in the session store for their user.

use anyhow::{Result, bail};
use common::{settings, token::AccessClaims, token::strict_validation};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{AuthError, AuthResult},
    session::{SessionStore, session_key},
};

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret for signing access tokens
    pub access_secret: String,
    /// Secret for signing refresh tokens
    pub refresh_secret: String,
    /// Access token lifetime in seconds (default: 15 minutes)
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: u64,
    /// Refresh token lifetime in seconds (default: 7 days)
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: u64,
}

/// Longest lifetime accepted for either token, in seconds (ten years)
pub const MAX_TOKEN_EXPIRY: u64 = 10 * 365 * 24 * 60 * 60;

fn default_access_token_expiry() -> u64 {
    900
}

fn default_refresh_token_expiry() -> u64 {
    604800
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_ACCESS_SECRET`: Secret for access tokens (required)
    /// - `JWT_REFRESH_SECRET`: Secret for refresh tokens (required, must differ)
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: Access token expiry in seconds (default: 900)
    /// - `JWT_REFRESH_TOKEN_EXPIRY`: Refresh token expiry in seconds (default: 604800)
    pub fn from_env() -> Result<Self> {
        let config: JwtConfig = settings::from_env("JWT")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.access_secret.is_empty() || self.refresh_secret.is_empty() {
            bail!("JWT_ACCESS_SECRET and JWT_REFRESH_SECRET must not be empty");
        }
        if self.access_secret == self.refresh_secret {
            bail!("JWT_ACCESS_SECRET and JWT_REFRESH_SECRET must differ");
        }
        for (name, expiry) in [
            ("JWT_ACCESS_TOKEN_EXPIRY", self.access_token_expiry),
            ("JWT_REFRESH_TOKEN_EXPIRY", self.refresh_token_expiry),
        ] {
            if expiry == 0 || expiry > MAX_TOKEN_EXPIRY {
                bail!("{} must be between 1 and {} seconds", name, MAX_TOKEN_EXPIRY);
            }
        }
        Ok(())
    }
}

/// Claims carried by a refresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub is_admin: bool,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Random token id, keeps two tokens issued in the same second distinct
    pub jti: String,
}

/// A signed token and the epoch second it expires at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: u64,
}

/// Tokens handed out at sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Expiration of the access token
    pub expires_at: u64,
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn require(value: &str, what: &str) -> AuthResult<()> {
    if value.is_empty() {
        return Err(AuthError::Validation(format!("{} is required", what)));
    }
    Ok(())
}

/// Issues and verifies tokens, recording refresh tokens in the session store
#[derive(Clone)]
pub struct TokenIssuer {
    access_key: EncodingKey,
    refresh_key: EncodingKey,
    refresh_decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
    sessions: Arc<dyn SessionStore>,
}

impl TokenIssuer {
    pub fn new(config: JwtConfig, sessions: Arc<dyn SessionStore>) -> Self {
        TokenIssuer {
            access_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation: strict_validation(),
            config,
            sessions,
        }
    }

    /// Sign an access token for a user
    pub fn issue_access(&self, user_id: &str, is_admin: bool) -> AuthResult<IssuedToken> {
        require(user_id, "user identity")?;

        let expires_at = now().saturating_add(self.config.access_token_expiry);
        let claims = AccessClaims {
            user_id: user_id.to_string(),
            is_admin,
            exp: expires_at,
        };

        let token =
            encode(&Header::default(), &claims, &self.access_key).map_err(AuthError::Signing)?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Sign a refresh token
    pub fn issue_refresh(&self, is_admin: bool) -> AuthResult<IssuedToken> {
        let iat = now();
        let expires_at = iat.saturating_add(self.config.refresh_token_expiry);
        let claims = RefreshClaims {
            is_admin,
            iat,
            exp: expires_at,
            jti: Uuid::new_v4().to_string(),
        };

        let token =
            encode(&Header::default(), &claims, &self.refresh_key).map_err(AuthError::Signing)?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Check a refresh token: signature and expiration, then an exact match
    /// against the token currently stored for the user. Returns the admin flag
    /// carried by the token.
    pub async fn verify_refresh(&self, user_id: &str, token: &str) -> AuthResult<bool> {
        require(user_id, "user identity")?;
        require(token, "refresh token")?;

        let claims = decode::<RefreshClaims>(token, &self.refresh_decoding_key, &self.validation)
            .map_err(|e| {
                warn!("Rejected refresh token for user {}: {}", user_id, e);
                AuthError::InvalidToken
            })?
            .claims;

        let stored = self
            .sessions
            .get(&session_key(user_id))
            .await
            .map_err(AuthError::Session)?;

        match stored {
            Some(current) if current == token => Ok(claims.is_admin),
            Some(_) => {
                warn!("Refresh token for user {} has been superseded", user_id);
                Err(AuthError::InvalidToken)
            }
            None => {
                warn!("No session stored for user {}", user_id);
                Err(AuthError::InvalidToken)
            }
        }
    }

    /// Exchange a live refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated and stays valid.
    pub async fn rotate_access(&self, user_id: &str, refresh_token: &str) -> AuthResult<IssuedToken> {
        let is_admin = self.verify_refresh(user_id, refresh_token).await?;
        info!("Issuing access token from refresh token for user {}", user_id);
        self.issue_access(user_id, is_admin)
    }

    /// Issue an access and refresh token, storing the refresh token as the
    /// user's only live one.
    pub async fn issue_session_pair(&self, user_id: &str, is_admin: bool) -> AuthResult<SessionPair> {
        let access = self.issue_access(user_id, is_admin)?;
        let refresh = self.issue_refresh(is_admin)?;

        self.sessions
            .set(&session_key(user_id), &refresh.token)
            .await
            .map_err(AuthError::Session)?;

        Ok(SessionPair {
            access_token: access.token,
            refresh_token: refresh.token,
            expires_at: access.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemorySessionStore, test_jwt_config};
    use common::token::AccessTokenVerifier;
    use serial_test::serial;

    fn issuer() -> (TokenIssuer, Arc<InMemorySessionStore>) {
        let sessions = Arc::new(InMemorySessionStore::default());
        (TokenIssuer::new(test_jwt_config(), sessions.clone()), sessions)
    }

    fn clear_jwt_env() {
        unsafe {
            std::env::remove_var("JWT_ACCESS_SECRET");
            std::env::remove_var("JWT_REFRESH_SECRET");
            std::env::remove_var("JWT_ACCESS_TOKEN_EXPIRY");
            std::env::remove_var("JWT_REFRESH_TOKEN_EXPIRY");
        }
    }

    #[test]
    #[serial]
    fn test_jwt_config_from_env() {
        clear_jwt_env();
        unsafe {
            std::env::set_var("JWT_ACCESS_SECRET", "access-secret");
            std::env::set_var("JWT_REFRESH_SECRET", "refresh-secret");
            std::env::set_var("JWT_ACCESS_TOKEN_EXPIRY", "60");
        }

        let config = JwtConfig::from_env().unwrap();
        assert_eq!(config.access_secret, "access-secret");
        assert_eq!(config.refresh_secret, "refresh-secret");
        assert_eq!(config.access_token_expiry, 60);
        assert_eq!(config.refresh_token_expiry, 604800);

        clear_jwt_env();
    }

    #[test]
    #[serial]
    fn test_jwt_config_rejects_shared_secret() {
        clear_jwt_env();
        unsafe {
            std::env::set_var("JWT_ACCESS_SECRET", "same-secret");
            std::env::set_var("JWT_REFRESH_SECRET", "same-secret");
        }

        assert!(JwtConfig::from_env().is_err());

        clear_jwt_env();
    }

    #[test]
    #[serial]
    fn test_jwt_config_rejects_out_of_range_expiry() {
        clear_jwt_env();
        unsafe {
            std::env::set_var("JWT_ACCESS_SECRET", "access-secret");
            std::env::set_var("JWT_REFRESH_SECRET", "refresh-secret");
            std::env::set_var("JWT_REFRESH_TOKEN_EXPIRY", (MAX_TOKEN_EXPIRY + 1).to_string());
        }
        assert!(JwtConfig::from_env().is_err());

        unsafe {
            std::env::set_var("JWT_REFRESH_TOKEN_EXPIRY", "604800");
            std::env::set_var("JWT_ACCESS_TOKEN_EXPIRY", "0");
        }
        assert!(JwtConfig::from_env().is_err());

        unsafe {
            std::env::set_var("JWT_ACCESS_TOKEN_EXPIRY", MAX_TOKEN_EXPIRY.to_string());
        }
        assert!(JwtConfig::from_env().is_ok());

        clear_jwt_env();
    }

    #[test]
    fn test_huge_expiry_does_not_overflow() {
        let config = JwtConfig {
            access_token_expiry: u64::MAX,
            refresh_token_expiry: u64::MAX,
            ..test_jwt_config()
        };
        let issuer = TokenIssuer::new(config, Arc::new(InMemorySessionStore::default()));

        assert_eq!(issuer.issue_access("user-1", false).unwrap().expires_at, u64::MAX);
        assert_eq!(issuer.issue_refresh(false).unwrap().expires_at, u64::MAX);
    }

    #[test]
    fn test_access_token_round_trip() {
        let (issuer, _) = issuer();
        let issued = issuer.issue_access("user-1", true).unwrap();

        let claims = AccessTokenVerifier::new("test-access-secret")
            .verify(&issued.token)
            .unwrap();
        assert_eq!(claims.user_id, "user-1");
        assert!(claims.is_admin);
        assert_eq!(claims.exp, issued.expires_at);
    }

    #[test]
    fn test_access_requires_identity() {
        let (issuer, _) = issuer();
        assert!(matches!(
            issuer.issue_access("", false),
            Err(AuthError::Validation(_))
        ));
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let (issuer, _) = issuer();
        let first = issuer.issue_refresh(false).unwrap();
        let second = issuer.issue_refresh(false).unwrap();
        assert_ne!(first.token, second.token);
    }

    #[test]
    fn test_refresh_token_not_accepted_as_access_token() {
        let (issuer, _) = issuer();
        let refresh = issuer.issue_refresh(false).unwrap();
        assert!(
            AccessTokenVerifier::new("test-access-secret")
                .verify(&refresh.token)
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_session_pair_is_stored_and_verifies() {
        let (issuer, sessions) = issuer();
        let pair = issuer.issue_session_pair("user-1", false).await.unwrap();

        assert_eq!(
            sessions.get(&session_key("user-1")).await.unwrap(),
            Some(pair.refresh_token.clone())
        );
        let is_admin = issuer
            .verify_refresh("user-1", &pair.refresh_token)
            .await
            .unwrap();
        assert!(!is_admin);
    }

    #[tokio::test]
    async fn test_new_pair_revokes_previous_refresh_token() {
        let (issuer, _) = issuer();
        let old = issuer.issue_session_pair("user-1", false).await.unwrap();
        let new = issuer.issue_session_pair("user-1", false).await.unwrap();

        assert!(matches!(
            issuer.verify_refresh("user-1", &old.refresh_token).await,
            Err(AuthError::InvalidToken)
        ));
        assert!(issuer.verify_refresh("user-1", &new.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_token_is_bound_to_stored_user() {
        let (issuer, _) = issuer();
        let pair = issuer.issue_session_pair("user-1", false).await.unwrap();

        assert!(matches!(
            issuer.verify_refresh("user-2", &pair.refresh_token).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_verify_refresh_rejects_bad_input() {
        let (issuer, _) = issuer();
        let pair = issuer.issue_session_pair("user-1", false).await.unwrap();

        assert!(matches!(
            issuer.verify_refresh("", &pair.refresh_token).await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            issuer.verify_refresh("user-1", "").await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            issuer.verify_refresh("user-1", "garbage").await,
            Err(AuthError::InvalidToken)
        ));
        // an access token is signed with the other secret
        assert!(matches!(
            issuer.verify_refresh("user-1", &pair.access_token).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_expired_refresh_token_rejected_even_if_stored() {
        let sessions = Arc::new(InMemorySessionStore::default());
        let issuer = TokenIssuer::new(test_jwt_config(), sessions.clone());

        let claims = RefreshClaims {
            is_admin: false,
            iat: now() - 10,
            exp: now() - 1,
            jti: Uuid::new_v4().to_string(),
        };
        let expired = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-refresh-secret"),
        )
        .unwrap();
        sessions.set(&session_key("user-1"), &expired).await.unwrap();

        assert!(matches!(
            issuer.verify_refresh("user-1", &expired).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_rotate_access_keeps_refresh_token_alive() {
        let (issuer, _) = issuer();
        let pair = issuer.issue_session_pair("user-1", true).await.unwrap();

        let first = issuer
            .rotate_access("user-1", &pair.refresh_token)
            .await
            .unwrap();
        let second = issuer
            .rotate_access("user-1", &pair.refresh_token)
            .await
            .unwrap();

        let verifier = AccessTokenVerifier::new("test-access-secret");
        for issued in [first, second] {
            let claims = verifier.verify(&issued.token).unwrap();
            assert_eq!(claims.user_id, "user-1");
            assert!(claims.is_admin);
        }
    }

    #[tokio::test]
    async fn test_session_store_failure_is_reported() {
        let sessions = Arc::new(InMemorySessionStore::failing());
        let issuer = TokenIssuer::new(test_jwt_config(), sessions);

        assert!(matches!(
            issuer.issue_session_pair("user-1", false).await,
            Err(AuthError::Session(_))
        ));
    }
}
