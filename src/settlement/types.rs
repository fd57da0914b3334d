use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repository::{SettledPrediction, Settlement};

/// Request body for recording a match's final score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResultRequest {
    pub home_score: i32,
    pub away_score: i32,
}

/// One prediction's awarded points in a settlement response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettledPredictionResponse {
    pub prediction_id: Uuid,
    pub user_id: Uuid,
    pub points: i32,
}

impl From<SettledPrediction> for SettledPredictionResponse {
    fn from(settled: SettledPrediction) -> Self {
        Self {
            prediction_id: settled.prediction_id,
            user_id: settled.user_id,
            points: settled.points,
        }
    }
}

/// Settlement data returned after recording a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementResponse {
    pub match_id: Uuid,
    pub home_score: i32,
    pub away_score: i32,
    pub predictions: Vec<SettledPredictionResponse>,
}

impl From<Settlement> for SettlementResponse {
    fn from(settlement: Settlement) -> Self {
        Self {
            match_id: settlement.match_id,
            home_score: settlement.home_score,
            away_score: settlement.away_score,
            predictions: settlement
                .predictions
                .into_iter()
                .map(SettledPredictionResponse::from)
                .collect(),
        }
    }
}
