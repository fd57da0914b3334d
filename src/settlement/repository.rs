use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

use super::scoring;
use crate::matches::repository::InMemoryMatchRepository;
use crate::prediction::repository::InMemoryPredictionRepository;
use crate::shared::AppError;

/// Points awarded to one prediction during settlement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledPrediction {
    pub prediction_id: Uuid,
    pub user_id: Uuid,
    pub points: i32,
}

/// A completed settlement: the recorded final score and every awarded
/// prediction
#[derive(Debug, Clone)]
pub struct Settlement {
    pub match_id: Uuid,
    pub home_score: i32,
    pub away_score: i32,
    pub predictions: Vec<SettledPrediction>,
}

/// Result of attempting to settle a match
#[derive(Debug, Clone)]
pub enum SettleResult {
    /// Final score recorded and all predictions scored
    Settled(Settlement),
    /// No match with the given id
    MatchNotFound,
    /// The match already has a recorded result
    AlreadyFinished,
}

/// Trait for the one mutation that spans matches and predictions
///
/// Settlement writes the final score, flips the finished flag and scores
/// every prediction for the match as a single atomic step. Implementations
/// must guarantee that two settlements of the same match cannot both
/// succeed and that a failure mid-way leaves no partial state behind.
#[async_trait]
pub trait SettlementStore {
    async fn settle_match(
        &self,
        match_id: Uuid,
        final_home: i32,
        final_away: i32,
    ) -> Result<SettleResult, AppError>;
}

/// In-memory implementation of SettlementStore for development and testing
///
/// Shares storage with the in-memory match and prediction repositories and
/// performs the whole settlement inside their locks.
pub struct InMemorySettlementStore {
    matches: Arc<InMemoryMatchRepository>,
    predictions: Arc<InMemoryPredictionRepository>,
}

impl InMemorySettlementStore {
    pub fn new(
        matches: Arc<InMemoryMatchRepository>,
        predictions: Arc<InMemoryPredictionRepository>,
    ) -> Self {
        Self {
            matches,
            predictions,
        }
    }
}

#[async_trait]
impl SettlementStore for InMemorySettlementStore {
    #[instrument(skip(self))]
    async fn settle_match(
        &self,
        match_id: Uuid,
        final_home: i32,
        final_away: i32,
    ) -> Result<SettleResult, AppError> {
        debug!(match_id = %match_id, "Settling match in memory");

        // Both locks are held for the whole settlement, always acquired in
        // this order. The finished-flag check and every write happen inside
        // one critical section, so a concurrent settlement of the same
        // match serializes behind this one and sees the flag already set.
        let mut matches = self.matches.lock_matches();
        let mut predictions = self.predictions.lock_predictions();

        let fixture = match matches.get_mut(&match_id) {
            Some(fixture) => fixture,
            None => {
                debug!(match_id = %match_id, "Match not found for settlement");
                return Ok(SettleResult::MatchNotFound);
            }
        };
        if fixture.is_finished {
            debug!(match_id = %match_id, "Match already settled");
            return Ok(SettleResult::AlreadyFinished);
        }

        fixture.home_score = Some(final_home);
        fixture.away_score = Some(final_away);
        fixture.is_finished = true;

        let mut settled = Vec::new();
        for prediction in predictions.values_mut() {
            if prediction.match_id != match_id {
                continue;
            }
            prediction.points = scoring::score_prediction(
                prediction.home_score,
                prediction.away_score,
                final_home,
                final_away,
            );
            settled.push(SettledPrediction {
                prediction_id: prediction.id,
                user_id: prediction.user_id,
                points: prediction.points,
            });
        }
        settled.sort_by_key(|s| s.prediction_id);

        debug!(
            match_id = %match_id,
            prediction_count = settled.len(),
            "Match settled successfully in memory"
        );

        Ok(SettleResult::Settled(Settlement {
            match_id,
            home_score: final_home,
            away_score: final_away,
            predictions: settled,
        }))
    }
}

/// PostgreSQL implementation of the settlement store
///
/// Runs the settlement in one transaction: the match row is locked with
/// FOR UPDATE before the finished flag is checked, so the first settlement
/// commits and any concurrent attempt blocks on the row lock, then reads
/// the committed flag and is rejected.
pub struct PostgresSettlementStore {
    pool: PgPool,
}

impl PostgresSettlementStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettlementStore for PostgresSettlementStore {
    #[instrument(skip(self))]
    async fn settle_match(
        &self,
        match_id: Uuid,
        final_home: i32,
        final_away: i32,
    ) -> Result<SettleResult, AppError> {
        debug!(match_id = %match_id, "Settling match in database");

        let mut tx = self.pool.begin().await.map_err(|e| {
            warn!(error = %e, "Failed to begin settlement transaction");
            AppError::DatabaseError(e.to_string())
        })?;

        let match_row = sqlx::query("SELECT is_finished FROM matches WHERE id = $1 FOR UPDATE")
            .bind(match_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                warn!(error = %e, match_id = %match_id, "Failed to lock match for settlement");
                AppError::DatabaseError(e.to_string())
            })?;

        // Dropping the transaction without committing rolls it back
        let match_row = match match_row {
            Some(row) => row,
            None => {
                debug!(match_id = %match_id, "Match not found for settlement");
                return Ok(SettleResult::MatchNotFound);
            }
        };
        if match_row.get::<bool, _>("is_finished") {
            debug!(match_id = %match_id, "Match already settled");
            return Ok(SettleResult::AlreadyFinished);
        }

        sqlx::query(
            "UPDATE matches SET home_score = $2, away_score = $3, is_finished = TRUE \
             WHERE id = $1",
        )
        .bind(match_id)
        .bind(final_home)
        .bind(final_away)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            warn!(error = %e, match_id = %match_id, "Failed to record final score");
            AppError::DatabaseError(e.to_string())
        })?;

        let prediction_rows = sqlx::query(
            "SELECT id, user_id, home_score, away_score FROM predictions \
             WHERE match_id = $1 FOR UPDATE",
        )
        .bind(match_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            warn!(error = %e, match_id = %match_id, "Failed to load predictions for settlement");
            AppError::DatabaseError(e.to_string())
        })?;

        let mut settled = Vec::with_capacity(prediction_rows.len());
        for row in &prediction_rows {
            let prediction_id: Uuid = row.get("id");
            let user_id: Uuid = row.get("user_id");

            let home_score: Option<i32> = row.try_get("home_score").map_err(|e| {
                warn!(error = %e, "Failed to decode prediction home score");
                AppError::DatabaseError(e.to_string())
            })?;
            let away_score: Option<i32> = row.try_get("away_score").map_err(|e| {
                warn!(error = %e, "Failed to decode prediction away score");
                AppError::DatabaseError(e.to_string())
            })?;
            let (home_score, away_score) = match (home_score, away_score) {
                (Some(home), Some(away)) => (home, away),
                _ => {
                    // Returning here drops the transaction, so the final
                    // score written above is rolled back with it
                    error!(
                        prediction_id = %prediction_id,
                        match_id = %match_id,
                        "Stored prediction has missing score fields, aborting settlement"
                    );
                    return Err(AppError::DataIntegrity(format!(
                        "Prediction {} has missing score fields",
                        prediction_id
                    )));
                }
            };

            let points =
                scoring::score_prediction(home_score, away_score, final_home, final_away);
            sqlx::query("UPDATE predictions SET points = $2 WHERE id = $1")
                .bind(prediction_id)
                .bind(points)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    warn!(error = %e, prediction_id = %prediction_id, "Failed to write awarded points");
                    AppError::DatabaseError(e.to_string())
                })?;

            settled.push(SettledPrediction {
                prediction_id,
                user_id,
                points,
            });
        }
        settled.sort_by_key(|s| s.prediction_id);

        tx.commit().await.map_err(|e| {
            warn!(error = %e, match_id = %match_id, "Failed to commit settlement transaction");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(
            match_id = %match_id,
            prediction_count = settled.len(),
            "Match settled successfully in database"
        );

        Ok(SettleResult::Settled(Settlement {
            match_id,
            home_score: final_home,
            away_score: final_away,
            predictions: settled,
        }))
    }
}
