use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::MatchModel;

/// Request payload for scheduling a new match
///
/// `start_time` must be an RFC 3339 timestamp with an explicit offset,
/// e.g. "2026-06-12T18:00:00Z"; offset-less values are rejected.
#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    pub home_team: String,
    pub away_team: String,
    pub start_time: DateTime<Utc>,
    pub stage: Option<String>,
    pub group_name: Option<String>,
}

/// Response for match creation and match listing
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResponse {
    pub id: Uuid,
    pub home_team: String,
    pub away_team: String,
    pub start_time: DateTime<Utc>,
    pub stage: String,
    pub group_name: Option<String>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub is_finished: bool,
}

impl From<MatchModel> for MatchResponse {
    fn from(fixture: MatchModel) -> Self {
        Self {
            id: fixture.id,
            home_team: fixture.home_team,
            away_team: fixture.away_team,
            start_time: fixture.start_time,
            stage: fixture.stage,
            group_name: fixture.group_name,
            home_score: fixture.home_score,
            away_score: fixture.away_score,
            is_finished: fixture.is_finished,
        }
    }
}
