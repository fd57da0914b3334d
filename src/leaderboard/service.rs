use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::types::LeaderboardEntry;
use crate::{
    prediction::repository::PredictionRepository, shared::AppError,
    user::repository::UserRepository,
};

/// Service for ranking users by their accumulated points
pub struct LeaderboardService {
    user_repository: Arc<dyn UserRepository + Send + Sync>,
    prediction_repository: Arc<dyn PredictionRepository + Send + Sync>,
}

impl LeaderboardService {
    pub fn new(
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        prediction_repository: Arc<dyn PredictionRepository + Send + Sync>,
    ) -> Self {
        Self {
            user_repository,
            prediction_repository,
        }
    }

    /// Ranks every user by total points, highest first
    ///
    /// Users without any prediction are listed with zero points. Ties are
    /// broken by username so equal scores always render in the same order.
    #[instrument(skip(self))]
    pub async fn rank(&self) -> Result<Vec<LeaderboardEntry>, AppError> {
        debug!("Building leaderboard");

        let users = self.user_repository.list_users().await?;
        let totals = self.prediction_repository.total_points_by_user().await?;

        let mut entries = users
            .into_iter()
            .map(|user| LeaderboardEntry {
                points: totals.get(&user.id).copied().unwrap_or(0),
                user_id: user.id,
                username: user.username,
                position: 0,
            })
            .collect::<Vec<_>>();

        entries.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| a.username.cmp(&b.username))
        });
        for (index, entry) in entries.iter_mut().enumerate() {
            entry.position = index as i32 + 1;
        }

        info!(user_count = entries.len(), "Leaderboard built successfully");

        Ok(entries)
    }
}
