use bcrypt::{hash, verify, DEFAULT_COST};
use tracing::warn;

use crate::shared::AppError;

/// Hashes a plaintext password with bcrypt
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST).map_err(|e| {
        warn!(error = %e, "Failed to hash password");
        AppError::Internal
    })
}

/// Verifies a plaintext password against a stored bcrypt hash
///
/// A malformed stored hash counts as a failed verification.
pub fn verify_password(password: &str, hash: &str) -> bool {
    verify(password, hash).unwrap_or(false)
}
