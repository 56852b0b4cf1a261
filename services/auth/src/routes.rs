//! Authentication service routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppState, error::AuthError};

/// Request for sign-up and sign-in
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub login: String,
    pub password: String,
}

/// Response for sign-up
#[derive(Serialize)]
pub struct SignUpResponse {
    pub user_id: String,
    pub message: String,
}

/// Response for sign-in
#[derive(Serialize)]
pub struct TokenResponse {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token expiration, seconds since the Unix epoch
    pub expiration: u64,
}

/// Request for token refresh
#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    pub user_id: String,
    pub refresh_token: String,
}

/// Response for token refresh
#[derive(Serialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expiration: u64,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/sign_up", post(sign_up))
        .route("/auth/sign_in", post(sign_in))
        .route("/auth/refresh", post(refresh_token))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// User registration endpoint
pub async fn sign_up(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CredentialsRequest>, AuthError>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Sign-up request for login: {}", payload.login);

    let user_id = state
        .auth_service
        .sign_up(&payload.login, &payload.password)
        .await?;

    let response = SignUpResponse {
        user_id: user_id.to_string(),
        message: "User created".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// User sign-in endpoint
pub async fn sign_in(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CredentialsRequest>, AuthError>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Sign-in attempt for login: {}", payload.login);

    let signed_in = state
        .auth_service
        .sign_in(&payload.login, &payload.password)
        .await?;

    let response = TokenResponse {
        user_id: signed_in.user_id.to_string(),
        access_token: signed_in.tokens.access_token,
        refresh_token: signed_in.tokens.refresh_token,
        token_type: "Bearer".to_string(),
        expiration: signed_in.tokens.expires_at,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Refresh token endpoint
pub async fn refresh_token(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RefreshTokenRequest>, AuthError>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Token refresh request for user: {}", payload.user_id);

    let issued = state
        .auth_service
        .refresh(&payload.user_id, &payload.refresh_token)
        .await?;

    let response = RefreshTokenResponse {
        access_token: issued.token,
        token_type: "Bearer".to_string(),
        expiration: issued.expires_at,
    };

    Ok((StatusCode::OK, Json(response)))
}
