use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{service::LeaderboardService, types::LeaderboardEntry};
use crate::shared::{AppError, AppState};

/// HTTP handler for the leaderboard
///
/// GET /leaderboard
/// Returns every user ranked by total points
#[instrument(name = "leaderboard", skip(state))]
pub async fn leaderboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let service = LeaderboardService::new(
        Arc::clone(&state.user_repository),
        Arc::clone(&state.prediction_repository),
    );
    let entries = service.rank().await?;

    info!(user_count = entries.len(), "Leaderboard served successfully");

    Ok(Json(entries))
}
