use axum::{extract::State, Extension, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::UserService,
    types::{LoginRequest, RegisterRequest, TokenResponse, UserResponse},
};
use crate::auth::AuthClaims;
use crate::shared::{AppError, AppState};

fn user_service(state: &AppState) -> UserService {
    UserService::new(
        Arc::clone(&state.user_repository),
        state.token_config.clone(),
        Arc::clone(&state.clock),
    )
}

/// HTTP handler for registering a new user
///
/// POST /register
/// Returns the created user's public profile
#[instrument(name = "register", skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, AppError> {
    info!(username = %request.username, "Registering new user");

    let user = user_service(&state).register(request).await?;

    info!(user_id = %user.id, username = %user.username, "User registered successfully");
    Ok(Json(user))
}

/// HTTP handler for logging in
///
/// POST /login
/// Returns a bearer token on success
#[instrument(name = "login", skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    info!(username = %request.username, "Login attempt");

    let token = user_service(&state).login(request).await?;

    Ok(Json(token))
}

/// HTTP handler for the authenticated user's own profile
///
/// GET /me
#[instrument(name = "me", skip(state, claims))]
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
) -> Result<Json<UserResponse>, AppError> {
    let user = user_service(&state).profile(claims.sub).await?;
    Ok(Json(user))
}
