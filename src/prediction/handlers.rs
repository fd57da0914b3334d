use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    service::PredictionService,
    types::{
        CreatePredictionRequest, MatchPredictionEntry, MyPredictionResponse, PredictionResponse,
        UpdatePredictionRequest,
    },
};
use crate::auth::AuthClaims;
use crate::shared::{AppError, AppState};

fn prediction_service(state: &AppState) -> PredictionService {
    PredictionService::new(
        Arc::clone(&state.prediction_repository),
        Arc::clone(&state.match_repository),
        Arc::clone(&state.user_repository),
        Arc::clone(&state.clock),
    )
}

/// HTTP handler for submitting a prediction
///
/// POST /predictions
/// Returns the created prediction
#[instrument(name = "create_prediction", skip(state, claims, request))]
pub async fn create_prediction(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Json(request): Json<CreatePredictionRequest>,
) -> Result<Json<PredictionResponse>, AppError> {
    info!(
        user_id = %claims.sub,
        match_id = %request.match_id,
        "Creating prediction"
    );

    let prediction = prediction_service(&state)
        .create_prediction(claims.sub, request)
        .await?;

    Ok(Json(prediction))
}

/// HTTP handler for changing an existing prediction
///
/// PUT /predictions/:prediction_id
/// Returns the updated prediction
#[instrument(name = "update_prediction", skip(state, claims, request))]
pub async fn update_prediction(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(prediction_id): Path<Uuid>,
    Json(request): Json<UpdatePredictionRequest>,
) -> Result<Json<PredictionResponse>, AppError> {
    info!(
        user_id = %claims.sub,
        prediction_id = %prediction_id,
        "Updating prediction"
    );

    let prediction = prediction_service(&state)
        .update_prediction(claims.sub, prediction_id, request)
        .await?;

    Ok(Json(prediction))
}

/// HTTP handler for the caller's own predictions
///
/// GET /my-predictions
/// Returns the caller's predictions joined with match summaries
#[instrument(name = "list_my_predictions", skip(state, claims))]
pub async fn list_my_predictions(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
) -> Result<Json<Vec<MyPredictionResponse>>, AppError> {
    let predictions = prediction_service(&state)
        .list_my_predictions(claims.sub)
        .await?;

    info!(
        user_id = %claims.sub,
        prediction_count = predictions.len(),
        "Own predictions listed successfully"
    );

    Ok(Json(predictions))
}

/// HTTP handler for everyone's predictions on a match
///
/// GET /matches/:match_id/predictions
/// Returns all predictions for the match once it has kicked off
#[instrument(name = "list_match_predictions", skip(state))]
pub async fn list_match_predictions(
    State(state): State<AppState>,
    Path(match_id): Path<Uuid>,
) -> Result<Json<Vec<MatchPredictionEntry>>, AppError> {
    let predictions = prediction_service(&state)
        .list_match_predictions(match_id)
        .await?;

    info!(
        match_id = %match_id,
        prediction_count = predictions.len(),
        "Match predictions listed successfully"
    );

    Ok(Json(predictions))
}
