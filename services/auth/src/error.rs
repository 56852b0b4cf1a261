//! Error type for the authentication service

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Everything that can reject an authentication request
#[derive(Error, Debug)]
pub enum AuthError {
    /// Input has the wrong shape; rejected before touching any store
    #[error("{0}")]
    Validation(String),

    /// Unknown login or wrong password; the two are deliberately not told apart
    #[error("wrong login or password")]
    WrongCredentials,

    #[error("login already exists")]
    LoginTaken,

    /// Bad signature, expired, or no longer the stored refresh token
    #[error("invalid or out of date token")]
    InvalidToken,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("credential store error: {0}")]
    Database(#[from] DatabaseError),

    #[error("session store error: {0:#}")]
    Session(anyhow::Error),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::WrongCredentials | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::LoginTaken => StatusCode::CONFLICT,
            AuthError::Hashing(_)
            | AuthError::Signing(_)
            | AuthError::Database(_)
            | AuthError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = if status.is_server_error() {
            error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::Validation(rejection.body_text())
    }
}

/// Type alias for authentication results
pub type AuthResult<T> = Result<T, AuthError>;
