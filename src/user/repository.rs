use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::UserModel;
use crate::shared::AppError;

/// Result of attempting to register a user
#[derive(Debug, Clone)]
pub enum CreateUserResult {
    /// User stored successfully
    Created(UserModel),
    /// The username is already taken
    UsernameTaken,
}

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository {
    /// Atomically inserts a user unless the username is already taken.
    /// Uniqueness is enforced here, not by a caller-side existence check,
    /// so concurrent registrations of the same name cannot both succeed.
    async fn try_create(&self, user: &UserModel) -> Result<CreateUserResult, AppError>;

    async fn get_by_id(&self, user_id: Uuid) -> Result<Option<UserModel>, AppError>;
    async fn get_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError>;
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError>;
}

/// In-memory implementation of UserRepository for development and testing
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, UserModel>>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user))]
    async fn try_create(&self, user: &UserModel) -> Result<CreateUserResult, AppError> {
        debug!(user_id = %user.id, username = %user.username, "Creating user in memory");

        // Username check and insert happen under one lock
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.username == user.username) {
            debug!(username = %user.username, "Username already taken");
            return Ok(CreateUserResult::UsernameTaken);
        }
        users.insert(user.id, user.clone());

        debug!(user_id = %user.id, "User created successfully in memory");
        Ok(CreateUserResult::Created(user.clone()))
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, user_id: Uuid) -> Result<Option<UserModel>, AppError> {
        debug!(user_id = %user_id, "Fetching user from memory");

        let users = self.users.lock().unwrap();
        Ok(users.get(&user_id).cloned())
    }

    #[instrument(skip(self))]
    async fn get_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        debug!(username = %username, "Fetching user by username from memory");

        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError> {
        debug!("Listing all users in memory");

        let users = self.users.lock().unwrap();
        Ok(users.values().cloned().collect())
    }
}

/// PostgreSQL implementation of user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &sqlx::postgres::PgRow) -> UserModel {
    UserModel {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user))]
    async fn try_create(&self, user: &UserModel) -> Result<CreateUserResult, AppError> {
        debug!(user_id = %user.id, username = %user.username, "Creating user in database");

        // The unique index on username arbitrates concurrent registrations
        let result = sqlx::query(
            "INSERT INTO users (id, username, password_hash, created_at) VALUES ($1, $2, $3, $4) ON CONFLICT (username) DO NOTHING",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create user in database");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            debug!(username = %user.username, "Username already taken");
            return Ok(CreateUserResult::UsernameTaken);
        }

        debug!(user_id = %user.id, "User created successfully in database");
        Ok(CreateUserResult::Created(user.clone()))
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, user_id: Uuid) -> Result<Option<UserModel>, AppError> {
        debug!(user_id = %user_id, "Fetching user from database");

        let row = sqlx::query(
            "SELECT id, username, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user_id, "Failed to fetch user from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.as_ref().map(user_from_row))
    }

    #[instrument(skip(self))]
    async fn get_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        debug!(username = %username, "Fetching user by username from database");

        let row = sqlx::query(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, username = %username, "Failed to fetch user by username from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.as_ref().map(user_from_row))
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError> {
        debug!("Listing all users from database");

        let rows = sqlx::query("SELECT id, username, password_hash, created_at FROM users")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to list users from database");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(rows.iter().map(user_from_row).collect())
    }
}
