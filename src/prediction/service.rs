use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use super::{
    models::PredictionModel,
    repository::{CreatePredictionResult, PredictionRepository},
    types::{
        CreatePredictionRequest, MatchPredictionEntry, MyPredictionResponse, PredictionResponse,
        UpdatePredictionRequest,
    },
    window,
};
use crate::{
    clock::Clock, matches::repository::MatchRepository, shared::AppError,
    user::repository::UserRepository,
};

const MIN_PREDICTED_SCORE: i32 = 0;
const MAX_PREDICTED_SCORE: i32 = 20;

/// Service for creating, updating and viewing predictions
pub struct PredictionService {
    prediction_repository: Arc<dyn PredictionRepository + Send + Sync>,
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
    user_repository: Arc<dyn UserRepository + Send + Sync>,
    clock: Arc<dyn Clock>,
}

impl PredictionService {
    pub fn new(
        prediction_repository: Arc<dyn PredictionRepository + Send + Sync>,
        match_repository: Arc<dyn MatchRepository + Send + Sync>,
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            prediction_repository,
            match_repository,
            user_repository,
            clock,
        }
    }

    fn validate_scores(home_score: i32, away_score: i32) -> Result<(), AppError> {
        let in_bounds =
            |score: i32| (MIN_PREDICTED_SCORE..=MAX_PREDICTED_SCORE).contains(&score);
        if !in_bounds(home_score) || !in_bounds(away_score) {
            return Err(AppError::Validation(format!(
                "Predicted scores must be between {} and {}",
                MIN_PREDICTED_SCORE, MAX_PREDICTED_SCORE
            )));
        }
        Ok(())
    }

    /// Submits a prediction for a match that has not kicked off yet
    #[instrument(skip(self, request))]
    pub async fn create_prediction(
        &self,
        user_id: Uuid,
        request: CreatePredictionRequest,
    ) -> Result<PredictionResponse, AppError> {
        Self::validate_scores(request.home_score, request.away_score)?;

        let fixture = self
            .match_repository
            .get_match(request.match_id)
            .await?
            .ok_or_else(|| {
                debug!(match_id = %request.match_id, "Match not found for prediction");
                AppError::NotFound("Match not found".to_string())
            })?;

        if !window::is_open(self.clock.now(), fixture.start_time) {
            debug!(
                match_id = %fixture.id,
                start_time = %fixture.start_time,
                "Prediction rejected, match has already started"
            );
            return Err(AppError::WindowClosed(
                "Match has already started".to_string(),
            ));
        }

        let prediction = PredictionModel::new(
            user_id,
            request.match_id,
            request.home_score,
            request.away_score,
            self.clock.now(),
        );

        match self.prediction_repository.try_create(&prediction).await? {
            CreatePredictionResult::Created(prediction) => {
                info!(
                    prediction_id = %prediction.id,
                    user_id = %user_id,
                    match_id = %prediction.match_id,
                    "Prediction created successfully"
                );
                Ok(PredictionResponse::from(prediction))
            }
            CreatePredictionResult::AlreadyExists => {
                debug!(
                    user_id = %user_id,
                    match_id = %request.match_id,
                    "User already has a prediction for this match"
                );
                Err(AppError::AlreadyExists(
                    "Prediction already exists for this match".to_string(),
                ))
            }
        }
    }

    /// Rewrites the caller's predicted scores while the match has not started
    #[instrument(skip(self, request))]
    pub async fn update_prediction(
        &self,
        user_id: Uuid,
        prediction_id: Uuid,
        request: UpdatePredictionRequest,
    ) -> Result<PredictionResponse, AppError> {
        Self::validate_scores(request.home_score, request.away_score)?;

        let prediction = self
            .prediction_repository
            .get_prediction(prediction_id)
            .await?
            .ok_or_else(|| {
                debug!(prediction_id = %prediction_id, "Prediction not found for update");
                AppError::NotFound("Prediction not found".to_string())
            })?;

        if prediction.user_id != user_id {
            debug!(
                prediction_id = %prediction_id,
                owner_id = %prediction.user_id,
                user_id = %user_id,
                "User attempted to update another user's prediction"
            );
            return Err(AppError::Forbidden(
                "You can only update your own predictions".to_string(),
            ));
        }

        let fixture = self
            .match_repository
            .get_match(prediction.match_id)
            .await?
            .ok_or_else(|| {
                error!(
                    prediction_id = %prediction.id,
                    match_id = %prediction.match_id,
                    "Prediction references a match that no longer exists"
                );
                AppError::DataIntegrity(format!(
                    "Prediction {} references missing match {}",
                    prediction.id, prediction.match_id
                ))
            })?;

        if !window::is_open(self.clock.now(), fixture.start_time) {
            debug!(
                prediction_id = %prediction_id,
                start_time = %fixture.start_time,
                "Update rejected, match has already started"
            );
            return Err(AppError::WindowClosed(
                "Match has already started".to_string(),
            ));
        }

        self.prediction_repository
            .update_scores(prediction_id, request.home_score, request.away_score)
            .await?;

        info!(
            prediction_id = %prediction_id,
            user_id = %user_id,
            "Prediction updated successfully"
        );

        Ok(PredictionResponse::from(PredictionModel {
            home_score: request.home_score,
            away_score: request.away_score,
            ..prediction
        }))
    }

    /// Lists the caller's predictions joined with their match summaries,
    /// ordered by kickoff time
    #[instrument(skip(self))]
    pub async fn list_my_predictions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<MyPredictionResponse>, AppError> {
        debug!(user_id = %user_id, "Listing own predictions");

        let predictions = self.prediction_repository.list_for_user(user_id).await?;
        let matches: HashMap<Uuid, _> = self
            .match_repository
            .list_matches()
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let mut responses = Vec::with_capacity(predictions.len());
        for prediction in &predictions {
            let fixture = matches.get(&prediction.match_id).ok_or_else(|| {
                error!(
                    prediction_id = %prediction.id,
                    match_id = %prediction.match_id,
                    "Prediction references a match that no longer exists"
                );
                AppError::DataIntegrity(format!(
                    "Prediction {} references missing match {}",
                    prediction.id, prediction.match_id
                ))
            })?;
            responses.push(MyPredictionResponse::new(prediction, fixture));
        }
        responses.sort_by_key(|r| (r.start_time, r.id));

        info!(
            user_id = %user_id,
            prediction_count = responses.len(),
            "Own predictions retrieved successfully"
        );

        Ok(responses)
    }

    /// Lists everyone's predictions for a match once it has kicked off.
    /// Awarded points are included only after the match is finished.
    #[instrument(skip(self))]
    pub async fn list_match_predictions(
        &self,
        match_id: Uuid,
    ) -> Result<Vec<MatchPredictionEntry>, AppError> {
        let fixture = self
            .match_repository
            .get_match(match_id)
            .await?
            .ok_or_else(|| {
                debug!(match_id = %match_id, "Match not found for prediction listing");
                AppError::NotFound("Match not found".to_string())
            })?;

        // Other users' predictions stay hidden while the window is open,
        // otherwise late predictors could copy earlier submissions
        if self.clock.now() < fixture.start_time {
            debug!(
                match_id = %match_id,
                start_time = %fixture.start_time,
                "Predictions requested before kickoff"
            );
            return Err(AppError::Forbidden(
                "Predictions are not visible until kickoff".to_string(),
            ));
        }

        let predictions = self.prediction_repository.list_for_match(match_id).await?;
        let users: HashMap<Uuid, _> = self
            .user_repository
            .list_users()
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut entries = Vec::with_capacity(predictions.len());
        for prediction in &predictions {
            let user = users.get(&prediction.user_id).ok_or_else(|| {
                error!(
                    prediction_id = %prediction.id,
                    user_id = %prediction.user_id,
                    "Prediction references a user that no longer exists"
                );
                AppError::DataIntegrity(format!(
                    "Prediction {} references missing user {}",
                    prediction.id, prediction.user_id
                ))
            })?;

            let points = if fixture.is_finished {
                Some(prediction.points)
            } else {
                None
            };
            entries.push(MatchPredictionEntry {
                username: user.username.clone(),
                prediction: format!("{}:{}", prediction.home_score, prediction.away_score),
                points,
            });
        }
        entries.sort_by(|a, b| a.username.cmp(&b.username));

        info!(
            match_id = %match_id,
            prediction_count = entries.len(),
            "Match predictions retrieved successfully"
        );

        Ok(entries)
    }
}
