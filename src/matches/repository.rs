use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::MatchModel;
use crate::shared::AppError;

/// Trait for match repository operations
#[async_trait]
pub trait MatchRepository {
    async fn create_match(&self, fixture: &MatchModel) -> Result<(), AppError>;
    async fn get_match(&self, match_id: Uuid) -> Result<Option<MatchModel>, AppError>;

    /// Lists all matches ordered by kickoff time ascending
    async fn list_matches(&self) -> Result<Vec<MatchModel>, AppError>;
}

/// In-memory implementation of MatchRepository for development and testing
pub struct InMemoryMatchRepository {
    matches: Mutex<HashMap<Uuid, MatchModel>>,
}

impl Default for InMemoryMatchRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMatchRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            matches: Mutex::new(HashMap::new()),
        }
    }

    /// Direct access to the match map for the in-memory settlement store,
    /// which must mutate matches and predictions under one critical section
    pub(crate) fn lock_matches(&self) -> MutexGuard<'_, HashMap<Uuid, MatchModel>> {
        self.matches.lock().unwrap()
    }
}

#[async_trait]
impl MatchRepository for InMemoryMatchRepository {
    #[instrument(skip(self, fixture))]
    async fn create_match(&self, fixture: &MatchModel) -> Result<(), AppError> {
        debug!(
            match_id = %fixture.id,
            home_team = %fixture.home_team,
            away_team = %fixture.away_team,
            "Creating match in memory"
        );

        let mut matches = self.matches.lock().unwrap();
        if matches.contains_key(&fixture.id) {
            warn!(match_id = %fixture.id, "Match already exists in memory");
            return Err(AppError::DatabaseError("Match already exists".to_string()));
        }
        matches.insert(fixture.id, fixture.clone());

        debug!(match_id = %fixture.id, "Match created successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_match(&self, match_id: Uuid) -> Result<Option<MatchModel>, AppError> {
        debug!(match_id = %match_id, "Fetching match from memory");

        let matches = self.matches.lock().unwrap();
        Ok(matches.get(&match_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_matches(&self) -> Result<Vec<MatchModel>, AppError> {
        debug!("Listing all matches in memory");

        let matches = self.matches.lock().unwrap();
        let mut list: Vec<MatchModel> = matches.values().cloned().collect();
        list.sort_by_key(|m| m.start_time);

        Ok(list)
    }
}

/// PostgreSQL implementation of match repository
pub struct PostgresMatchRepository {
    pool: PgPool,
}

impl PostgresMatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn match_from_row(row: &sqlx::postgres::PgRow) -> MatchModel {
    MatchModel {
        id: row.get("id"),
        home_team: row.get("home_team"),
        away_team: row.get("away_team"),
        start_time: row.get("start_time"),
        stage: row.get("stage"),
        group_name: row.get("group_name"),
        home_score: row.get("home_score"),
        away_score: row.get("away_score"),
        is_finished: row.get("is_finished"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl MatchRepository for PostgresMatchRepository {
    #[instrument(skip(self, fixture))]
    async fn create_match(&self, fixture: &MatchModel) -> Result<(), AppError> {
        debug!(
            match_id = %fixture.id,
            home_team = %fixture.home_team,
            away_team = %fixture.away_team,
            "Creating match in database"
        );

        sqlx::query(
            "INSERT INTO matches (id, home_team, away_team, start_time, stage, group_name, home_score, away_score, is_finished, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(fixture.id)
        .bind(&fixture.home_team)
        .bind(&fixture.away_team)
        .bind(fixture.start_time)
        .bind(&fixture.stage)
        .bind(&fixture.group_name)
        .bind(fixture.home_score)
        .bind(fixture.away_score)
        .bind(fixture.is_finished)
        .bind(fixture.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create match in database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(match_id = %fixture.id, "Match created successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_match(&self, match_id: Uuid) -> Result<Option<MatchModel>, AppError> {
        debug!(match_id = %match_id, "Fetching match from database");

        let row = sqlx::query(
            "SELECT id, home_team, away_team, start_time, stage, group_name, home_score, away_score, is_finished, created_at \
             FROM matches WHERE id = $1",
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, match_id = %match_id, "Failed to fetch match from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.as_ref().map(match_from_row))
    }

    #[instrument(skip(self))]
    async fn list_matches(&self) -> Result<Vec<MatchModel>, AppError> {
        debug!("Listing all matches from database");

        let rows = sqlx::query(
            "SELECT id, home_team, away_team, start_time, stage, group_name, home_score, away_score, is_finished, created_at \
             FROM matches ORDER BY start_time ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list matches from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(rows.iter().map(match_from_row).collect())
    }
}
