use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of the ranked leaderboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: Uuid,
    pub username: String,
    pub points: i64,
    pub position: i32,
}
