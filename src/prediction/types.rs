use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::PredictionModel;
use crate::matches::models::MatchModel;

/// Request body for submitting a prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePredictionRequest {
    pub match_id: Uuid,
    pub home_score: i32,
    pub away_score: i32,
}

/// Request body for changing an existing prediction's scores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePredictionRequest {
    pub home_score: i32,
    pub away_score: i32,
}

/// Prediction data returned after create and update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub id: Uuid,
    pub match_id: Uuid,
    pub home_score: i32,
    pub away_score: i32,
    pub points: i32,
}

impl From<PredictionModel> for PredictionResponse {
    fn from(prediction: PredictionModel) -> Self {
        Self {
            id: prediction.id,
            match_id: prediction.match_id,
            home_score: prediction.home_score,
            away_score: prediction.away_score,
            points: prediction.points,
        }
    }
}

/// One of the caller's own predictions, joined with its match summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyPredictionResponse {
    pub id: Uuid,
    pub match_id: Uuid,
    pub home_team: String,
    pub away_team: String,
    pub start_time: DateTime<Utc>,
    pub prediction_home: i32,
    pub prediction_away: i32,
    pub points: i32,
}

impl MyPredictionResponse {
    pub fn new(prediction: &PredictionModel, fixture: &MatchModel) -> Self {
        Self {
            id: prediction.id,
            match_id: prediction.match_id,
            home_team: fixture.home_team.clone(),
            away_team: fixture.away_team.clone(),
            start_time: fixture.start_time,
            prediction_home: prediction.home_score,
            prediction_away: prediction.away_score,
            points: prediction.points,
        }
    }
}

/// Another user's prediction for a match, visible once the match has kicked off.
/// Points stay null until the match is finished.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPredictionEntry {
    pub username: String,
    pub prediction: String,
    pub points: Option<i32>,
}
