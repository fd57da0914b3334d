use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the predictions table
///
/// At most one row exists per (user_id, match_id) pair.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PredictionModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub match_id: Uuid,
    pub home_score: i32, // Predicted goals for the home side
    pub away_score: i32,
    pub points: i32, // 0 until the match is settled
    pub created_at: DateTime<Utc>,
}

impl PredictionModel {
    /// Creates a new unsettled prediction with a generated ID
    pub fn new(
        user_id: Uuid,
        match_id: Uuid,
        home_score: i32,
        away_score: i32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            match_id,
            home_score,
            away_score,
            points: 0,
            created_at,
        }
    }
}
