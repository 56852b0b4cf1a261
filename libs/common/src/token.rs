//! Access token claims shared by the issuing and the verifying services
//!
//! The auth service signs access tokens with the access secret; every other
//! service only needs the same secret to check them. Access tokens are never
//! persisted, so signature and expiration are the whole check.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::Error as JwtError};
use serde::{Deserialize, Serialize};

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Opaque user identity
    pub user_id: String,
    /// Whether the user may call admin routes
    pub is_admin: bool,
    /// Expiration time (seconds since the Unix epoch)
    pub exp: u64,
}

/// HS256 validation with zero leeway, so a token is rejected as soon as its
/// expiration epoch has passed.
pub fn strict_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation
}

/// Verifies access tokens against the access secret
#[derive(Clone)]
pub struct AccessTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AccessTokenVerifier {
    pub fn new(access_secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(access_secret.as_bytes()),
            validation: strict_validation(),
        }
    }

    /// Decode a token, checking signature and expiration
    pub fn verify(&self, token: &str) -> Result<AccessClaims, JwtError> {
        decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
    }
}
