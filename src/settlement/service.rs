use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{
    repository::{SettleResult, SettlementStore},
    types::{MatchResultRequest, SettlementResponse},
};
use crate::shared::AppError;

/// Service for recording final scores and settling predictions
pub struct SettlementService {
    store: Arc<dyn SettlementStore + Send + Sync>,
}

impl SettlementService {
    pub fn new(store: Arc<dyn SettlementStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// Records a final score and awards points for every prediction on the
    /// match. Succeeds at most once per match.
    #[instrument(skip(self, request))]
    pub async fn settle_match(
        &self,
        match_id: Uuid,
        request: MatchResultRequest,
    ) -> Result<SettlementResponse, AppError> {
        if request.home_score < 0 || request.away_score < 0 {
            return Err(AppError::Validation(
                "Final scores must not be negative".to_string(),
            ));
        }

        let result = self
            .store
            .settle_match(match_id, request.home_score, request.away_score)
            .await?;

        match result {
            SettleResult::Settled(settlement) => {
                info!(
                    match_id = %match_id,
                    home_score = settlement.home_score,
                    away_score = settlement.away_score,
                    prediction_count = settlement.predictions.len(),
                    "Match settled successfully"
                );
                Ok(SettlementResponse::from(settlement))
            }
            SettleResult::MatchNotFound => {
                debug!(match_id = %match_id, "Match not found for settlement");
                Err(AppError::NotFound("Match not found".to_string()))
            }
            SettleResult::AlreadyFinished => {
                debug!(match_id = %match_id, "Match result already recorded");
                Err(AppError::AlreadyFinished(
                    "Match result has already been recorded".to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::models::MatchModel;
    use crate::matches::repository::{InMemoryMatchRepository, MatchRepository};
    use crate::prediction::models::PredictionModel;
    use crate::prediction::repository::{InMemoryPredictionRepository, PredictionRepository};
    use crate::settlement::repository::InMemorySettlementStore;
    use chrono::{Duration, Utc};

    struct Setup {
        service: SettlementService,
        matches: Arc<InMemoryMatchRepository>,
        predictions: Arc<InMemoryPredictionRepository>,
    }

    fn setup() -> Setup {
        let matches = Arc::new(InMemoryMatchRepository::new());
        let predictions = Arc::new(InMemoryPredictionRepository::new());
        let store = Arc::new(InMemorySettlementStore::new(
            matches.clone(),
            predictions.clone(),
        ));
        Setup {
            service: SettlementService::new(store),
            matches,
            predictions,
        }
    }

    async fn seed_match(setup: &Setup) -> MatchModel {
        let fixture = MatchModel::new(
            "Poland".to_string(),
            "Germany".to_string(),
            Utc::now() - Duration::hours(2),
            "group".to_string(),
            Some("A".to_string()),
            Utc::now() - Duration::days(1),
        );
        setup.matches.create_match(&fixture).await.unwrap();
        fixture
    }

    fn result_request(home: i32, away: i32) -> MatchResultRequest {
        MatchResultRequest {
            home_score: home,
            away_score: away,
        }
    }

    #[tokio::test]
    async fn test_settle_match_awards_points() {
        let setup = setup();
        let fixture = seed_match(&setup).await;

        let user_id = Uuid::new_v4();
        let prediction = PredictionModel::new(user_id, fixture.id, 3, 1, Utc::now());
        setup.predictions.try_create(&prediction).await.unwrap();

        let response = setup
            .service
            .settle_match(fixture.id, result_request(3, 1))
            .await
            .unwrap();

        assert_eq!(response.match_id, fixture.id);
        assert_eq!(response.predictions.len(), 1);
        assert_eq!(response.predictions[0].user_id, user_id);
        assert_eq!(response.predictions[0].points, 2);
    }

    #[tokio::test]
    async fn test_settle_match_not_found() {
        let setup = setup();

        let result = setup
            .service
            .settle_match(Uuid::new_v4(), result_request(1, 0))
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_settle_match_twice() {
        let setup = setup();
        let fixture = seed_match(&setup).await;

        setup
            .service
            .settle_match(fixture.id, result_request(2, 2))
            .await
            .unwrap();
        let result = setup
            .service
            .settle_match(fixture.id, result_request(0, 0))
            .await;

        assert!(matches!(result, Err(AppError::AlreadyFinished(_))));

        let stored = setup.matches.get_match(fixture.id).await.unwrap().unwrap();
        assert_eq!(stored.final_score(), Some((2, 2)));
    }

    #[tokio::test]
    async fn test_settle_match_rejects_negative_score() {
        let setup = setup();
        let fixture = seed_match(&setup).await;

        let result = setup
            .service
            .settle_match(fixture.id, result_request(-1, 0))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
