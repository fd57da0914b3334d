use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the matches table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MatchModel {
    pub id: Uuid,
    pub home_team: String,
    pub away_team: String,
    pub start_time: DateTime<Utc>, // Kickoff instant, UTC
    pub stage: String,             // Tournament stage, e.g. "group"
    pub group_name: Option<String>, // Group label, only for the group stage
    pub home_score: Option<i32>,   // Final score, null until finished
    pub away_score: Option<i32>,
    pub is_finished: bool,
    pub created_at: DateTime<Utc>,
}

impl MatchModel {
    /// Creates a new unfinished match with a generated ID
    pub fn new(
        home_team: String,
        away_team: String,
        start_time: DateTime<Utc>,
        stage: String,
        group_name: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            home_team,
            away_team,
            start_time,
            stage,
            group_name,
            home_score: None,
            away_score: None,
            is_finished: false,
            created_at,
        }
    }

    /// The final score, present only once the match is finished
    pub fn final_score(&self) -> Option<(i32, i32)> {
        match (self.home_score, self.away_score) {
            (Some(home), Some(away)) => Some((home, away)),
            _ => None,
        }
    }
}
