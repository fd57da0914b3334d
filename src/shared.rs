use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::token::TokenConfig;
use crate::clock::Clock;
use crate::matches::repository::MatchRepository;
use crate::prediction::repository::PredictionRepository;
use crate::settlement::repository::SettlementStore;
use crate::user::repository::UserRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
    pub match_repository: Arc<dyn MatchRepository + Send + Sync>,
    pub prediction_repository: Arc<dyn PredictionRepository + Send + Sync>,
    pub settlement_store: Arc<dyn SettlementStore + Send + Sync>,
    pub clock: Arc<dyn Clock>,
    pub token_config: TokenConfig,
}

impl AppState {
    pub fn new(
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        match_repository: Arc<dyn MatchRepository + Send + Sync>,
        prediction_repository: Arc<dyn PredictionRepository + Send + Sync>,
        settlement_store: Arc<dyn SettlementStore + Send + Sync>,
        clock: Arc<dyn Clock>,
        token_config: TokenConfig,
    ) -> Self {
        Self {
            user_repository,
            match_repository,
            prediction_repository,
            settlement_store,
            clock,
            token_config,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Prediction window closed: {0}")]
    WindowClosed(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Already finished: {0}")]
    AlreadyFinished(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::JwtError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::WindowClosed(msg) => (StatusCode::CONFLICT, msg),
            AppError::AlreadyExists(msg) => (StatusCode::CONFLICT, msg),
            AppError::AlreadyFinished(msg) => (StatusCode::CONFLICT, msg),
            AppError::DataIntegrity(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Data integrity error: {}", msg),
            ),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
