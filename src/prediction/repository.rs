use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

use super::models::PredictionModel;
use crate::shared::AppError;

/// Result of attempting to create a prediction
#[derive(Debug, Clone)]
pub enum CreatePredictionResult {
    /// Prediction stored successfully
    Created(PredictionModel),
    /// The user already has a prediction for this match
    AlreadyExists,
}

/// Trait for prediction repository operations
#[async_trait]
pub trait PredictionRepository {
    /// Atomically inserts a prediction unless one already exists for the
    /// same (user, match) pair. The uniqueness decision is made here, in
    /// one step with the insert, so two concurrent creates cannot both
    /// pass an application-side existence check.
    async fn try_create(
        &self,
        prediction: &PredictionModel,
    ) -> Result<CreatePredictionResult, AppError>;

    async fn get_prediction(
        &self,
        prediction_id: Uuid,
    ) -> Result<Option<PredictionModel>, AppError>;

    /// Overwrites the predicted scores, leaving points untouched
    async fn update_scores(
        &self,
        prediction_id: Uuid,
        home_score: i32,
        away_score: i32,
    ) -> Result<(), AppError>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<PredictionModel>, AppError>;
    async fn list_for_match(&self, match_id: Uuid) -> Result<Vec<PredictionModel>, AppError>;

    /// Sum of awarded points per user, for users that have predictions
    async fn total_points_by_user(&self) -> Result<HashMap<Uuid, i64>, AppError>;
}

/// In-memory implementation of PredictionRepository for development and testing
pub struct InMemoryPredictionRepository {
    predictions: Mutex<HashMap<Uuid, PredictionModel>>,
}

impl Default for InMemoryPredictionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPredictionRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            predictions: Mutex::new(HashMap::new()),
        }
    }

    /// Direct access to the prediction map for the in-memory settlement
    /// store, which must mutate matches and predictions under one critical
    /// section
    pub(crate) fn lock_predictions(&self) -> MutexGuard<'_, HashMap<Uuid, PredictionModel>> {
        self.predictions.lock().unwrap()
    }
}

#[async_trait]
impl PredictionRepository for InMemoryPredictionRepository {
    #[instrument(skip(self, prediction))]
    async fn try_create(
        &self,
        prediction: &PredictionModel,
    ) -> Result<CreatePredictionResult, AppError> {
        debug!(
            prediction_id = %prediction.id,
            user_id = %prediction.user_id,
            match_id = %prediction.match_id,
            "Creating prediction in memory"
        );

        // Pair check and insert happen under one lock
        let mut predictions = self.predictions.lock().unwrap();
        let duplicate = predictions
            .values()
            .any(|p| p.user_id == prediction.user_id && p.match_id == prediction.match_id);
        if duplicate {
            debug!(
                user_id = %prediction.user_id,
                match_id = %prediction.match_id,
                "Prediction already exists for this user and match"
            );
            return Ok(CreatePredictionResult::AlreadyExists);
        }
        predictions.insert(prediction.id, prediction.clone());

        debug!(prediction_id = %prediction.id, "Prediction created successfully in memory");
        Ok(CreatePredictionResult::Created(prediction.clone()))
    }

    #[instrument(skip(self))]
    async fn get_prediction(
        &self,
        prediction_id: Uuid,
    ) -> Result<Option<PredictionModel>, AppError> {
        debug!(prediction_id = %prediction_id, "Fetching prediction from memory");

        let predictions = self.predictions.lock().unwrap();
        Ok(predictions.get(&prediction_id).cloned())
    }

    #[instrument(skip(self))]
    async fn update_scores(
        &self,
        prediction_id: Uuid,
        home_score: i32,
        away_score: i32,
    ) -> Result<(), AppError> {
        debug!(prediction_id = %prediction_id, "Updating prediction scores in memory");

        let mut predictions = self.predictions.lock().unwrap();
        let prediction = predictions.get_mut(&prediction_id).ok_or_else(|| {
            warn!(prediction_id = %prediction_id, "Prediction not found for update in memory");
            AppError::NotFound("Prediction not found".to_string())
        })?;

        prediction.home_score = home_score;
        prediction.away_score = away_score;

        debug!(prediction_id = %prediction_id, "Prediction updated successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<PredictionModel>, AppError> {
        debug!(user_id = %user_id, "Listing predictions for user from memory");

        let predictions = self.predictions.lock().unwrap();
        Ok(predictions
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_for_match(&self, match_id: Uuid) -> Result<Vec<PredictionModel>, AppError> {
        debug!(match_id = %match_id, "Listing predictions for match from memory");

        let predictions = self.predictions.lock().unwrap();
        Ok(predictions
            .values()
            .filter(|p| p.match_id == match_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn total_points_by_user(&self) -> Result<HashMap<Uuid, i64>, AppError> {
        debug!("Summing points per user from memory");

        let predictions = self.predictions.lock().unwrap();
        let mut totals: HashMap<Uuid, i64> = HashMap::new();
        for prediction in predictions.values() {
            *totals.entry(prediction.user_id).or_insert(0) += prediction.points as i64;
        }

        Ok(totals)
    }
}

/// PostgreSQL implementation of prediction repository
pub struct PostgresPredictionRepository {
    pool: PgPool,
}

impl PostgresPredictionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a prediction row, treating NULL score fields as a data-integrity
/// violation rather than silently defaulting them
pub(crate) fn prediction_from_row(
    row: &sqlx::postgres::PgRow,
) -> Result<PredictionModel, AppError> {
    let id: Uuid = row.get("id");

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
            error!(prediction_id = %id, "Stored prediction has missing score fields");
            return Err(AppError::DataIntegrity(format!(
                "Prediction {} has missing score fields",
                id
            )));
        }
    };

    Ok(PredictionModel {
        id,
        user_id: row.get("user_id"),
        match_id: row.get("match_id"),
        home_score,
        away_score,
        points: row.get("points"),
        created_at: row.get("created_at"),
    })
}

#[async_trait]
impl PredictionRepository for PostgresPredictionRepository {
    #[instrument(skip(self, prediction))]
    async fn try_create(
        &self,
        prediction: &PredictionModel,
    ) -> Result<CreatePredictionResult, AppError> {
        debug!(
            prediction_id = %prediction.id,
            user_id = %prediction.user_id,
            match_id = %prediction.match_id,
            "Creating prediction in database"
        );

        // The unique index on (user_id, match_id) arbitrates concurrent creates
        let result = sqlx::query(
            "INSERT INTO predictions (id, user_id, match_id, home_score, away_score, points, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) ON CONFLICT (user_id, match_id) DO NOTHING",
        )
        .bind(prediction.id)
        .bind(prediction.user_id)
        .bind(prediction.match_id)
        .bind(prediction.home_score)
        .bind(prediction.away_score)
        .bind(prediction.points)
        .bind(prediction.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create prediction in database");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            debug!(
                user_id = %prediction.user_id,
                match_id = %prediction.match_id,
                "Prediction already exists for this user and match"
            );
            return Ok(CreatePredictionResult::AlreadyExists);
        }

        debug!(prediction_id = %prediction.id, "Prediction created successfully in database");
        Ok(CreatePredictionResult::Created(prediction.clone()))
    }

    #[instrument(skip(self))]
    async fn get_prediction(
        &self,
        prediction_id: Uuid,
    ) -> Result<Option<PredictionModel>, AppError> {
        debug!(prediction_id = %prediction_id, "Fetching prediction from database");

        let row = sqlx::query(
            "SELECT id, user_id, match_id, home_score, away_score, points, created_at \
             FROM predictions WHERE id = $1",
        )
        .bind(prediction_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, prediction_id = %prediction_id, "Failed to fetch prediction from database");
            AppError::DatabaseError(e.to_string())
        })?;

        row.as_ref().map(prediction_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn update_scores(
        &self,
        prediction_id: Uuid,
        home_score: i32,
        away_score: i32,
    ) -> Result<(), AppError> {
        debug!(prediction_id = %prediction_id, "Updating prediction scores in database");

        let result = sqlx::query(
            "UPDATE predictions SET home_score = $2, away_score = $3 WHERE id = $1",
        )
        .bind(prediction_id)
        .bind(home_score)
        .bind(away_score)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, prediction_id = %prediction_id, "Failed to update prediction in database");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            warn!(prediction_id = %prediction_id, "Prediction not found for update");
            return Err(AppError::NotFound("Prediction not found".to_string()));
        }

        debug!(prediction_id = %prediction_id, "Prediction updated successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<PredictionModel>, AppError> {
        debug!(user_id = %user_id, "Listing predictions for user from database");

        let rows = sqlx::query(
            "SELECT id, user_id, match_id, home_score, away_score, points, created_at \
             FROM predictions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user_id, "Failed to list predictions for user");
            AppError::DatabaseError(e.to_string())
        })?;

        rows.iter().map(prediction_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn list_for_match(&self, match_id: Uuid) -> Result<Vec<PredictionModel>, AppError> {
        debug!(match_id = %match_id, "Listing predictions for match from database");

        let rows = sqlx::query(
            "SELECT id, user_id, match_id, home_score, away_score, points, created_at \
             FROM predictions WHERE match_id = $1",
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, match_id = %match_id, "Failed to list predictions for match");
            AppError::DatabaseError(e.to_string())
        })?;

        rows.iter().map(prediction_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn total_points_by_user(&self) -> Result<HashMap<Uuid, i64>, AppError> {
        debug!("Summing points per user from database");

        let rows = sqlx::query(
            "SELECT user_id, COALESCE(SUM(points), 0) AS total_points \
             FROM predictions GROUP BY user_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to sum points per user");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(rows
            .iter()
            .map(|row| (row.get::<Uuid, _>("user_id"), row.get::<i64, _>("total_points")))
            .collect())
    }
}
