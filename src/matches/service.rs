use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::MatchModel,
    repository::MatchRepository,
    types::{CreateMatchRequest, MatchResponse},
};
use crate::{clock::Clock, shared::AppError};

const DEFAULT_STAGE: &str = "group";

/// Service for scheduling and listing matches
pub struct MatchService {
    repository: Arc<dyn MatchRepository + Send + Sync>,
    clock: Arc<dyn Clock>,
}

impl MatchService {
    pub fn new(repository: Arc<dyn MatchRepository + Send + Sync>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Schedules a new match
    #[instrument(skip(self, request))]
    pub async fn create_match(
        &self,
        request: CreateMatchRequest,
    ) -> Result<MatchResponse, AppError> {
        let home_team = request.home_team.trim();
        let away_team = request.away_team.trim();
        if home_team.is_empty() || away_team.is_empty() {
            return Err(AppError::Validation(
                "Team names must not be empty".to_string(),
            ));
        }

        let stage = request
            .stage
            .unwrap_or_else(|| DEFAULT_STAGE.to_string());

        let fixture = MatchModel::new(
            home_team.to_string(),
            away_team.to_string(),
            request.start_time,
            stage,
            request.group_name,
            self.clock.now(),
        );
        debug!(match_id = %fixture.id, "Generated match ID");

        self.repository.create_match(&fixture).await?;

        info!(
            match_id = %fixture.id,
            home_team = %fixture.home_team,
            away_team = %fixture.away_team,
            start_time = %fixture.start_time,
            "Match created successfully"
        );

        Ok(MatchResponse::from(fixture))
    }

    /// Lists all matches ordered by kickoff time
    #[instrument(skip(self))]
    pub async fn list_matches(&self) -> Result<Vec<MatchResponse>, AppError> {
        debug!("Listing all matches");

        let matches = self.repository.list_matches().await?;

        info!(match_count = matches.len(), "Matches retrieved successfully");

        Ok(matches.into_iter().map(MatchResponse::from).collect())
    }
}
