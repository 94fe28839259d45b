//! Authentication routes: login and refresh-token
//!
//! Both return the same token-pair shape. Either the full pair is issued
//! or nothing is.

use crate::error::ApiResult;
use crate::services::{AuthService, TokenPair};
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Deserialize;

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Refresh request body
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// POST /login
///
/// Verifies credentials and returns an access/refresh token pair with
/// their expiry timestamps.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenPair>> {
    let pair = AuthService::login(state.db(), state.jwt(), &req.username, &req.password).await?;
    Ok(Json(pair))
}

/// POST /refresh-token
///
/// Accepts a refresh-class token and rotates the pair. Access tokens are
/// rejected here just as refresh tokens are rejected on protected routes.
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> ApiResult<Json<TokenPair>> {
    let pair = AuthService::refresh(state.db(), state.jwt(), &req.refresh_token).await?;
    Ok(Json(pair))
}
