use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the users table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserModel {
    pub id: Uuid,
    pub username: String, // Unique handle chosen at registration
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserModel {
    /// Creates a new user model with a generated ID
    pub fn new(username: String, password_hash: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            created_at,
        }
    }
}
