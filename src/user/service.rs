use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{
    models::UserModel,
    repository::{CreateUserResult, UserRepository},
    types::{LoginRequest, RegisterRequest, TokenResponse, UserResponse},
};
use crate::{
    auth::password,
    auth::token::TokenConfig,
    clock::Clock,
    shared::AppError,
};

const MAX_USERNAME_LENGTH: usize = 32;
const MIN_PASSWORD_LENGTH: usize = 8;

/// Service for registration, login and profile lookup
pub struct UserService {
    repository: Arc<dyn UserRepository + Send + Sync>,
    token_config: TokenConfig,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository + Send + Sync>,
        token_config: TokenConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            token_config,
            clock,
        }
    }

    /// Registers a new user with a bcrypt-hashed password
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse, AppError> {
        let username = request.username.trim();
        if username.is_empty() {
            return Err(AppError::Validation("Username must not be empty".to_string()));
        }
        if username.chars().count() > MAX_USERNAME_LENGTH {
            return Err(AppError::Validation(format!(
                "Username must be at most {} characters",
                MAX_USERNAME_LENGTH
            )));
        }
        if request.password.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let password_hash = password::hash_password(&request.password)?;
        let user = UserModel::new(username.to_string(), password_hash, self.clock.now());

        match self.repository.try_create(&user).await? {
            CreateUserResult::Created(user) => {
                info!(user_id = %user.id, username = %user.username, "User registered");
                Ok(UserResponse::from(user))
            }
            CreateUserResult::UsernameTaken => {
                debug!(username = %username, "Registration rejected, username taken");
                Err(AppError::AlreadyExists("User already exists".to_string()))
            }
        }
    }

    /// Verifies credentials and issues a JWT
    ///
    /// Unknown username and wrong password produce the same error so the
    /// response does not reveal which one failed.
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> Result<TokenResponse, AppError> {
        let user = self.repository.get_by_username(&request.username).await?;

        let user = match user {
            Some(user) if password::verify_password(&request.password, &user.password_hash) => {
                user
            }
            _ => {
                debug!(username = %request.username, "Login rejected");
                return Err(AppError::Unauthorized("Invalid credentials".to_string()));
            }
        };

        let access_token = self
            .token_config
            .create_token(user.id, user.username.clone())?;

        info!(user_id = %user.id, username = %user.username, "User logged in");
        Ok(TokenResponse { access_token })
    }

    /// Loads the profile behind an authenticated user id
    #[instrument(skip(self))]
    pub async fn profile(&self, user_id: Uuid) -> Result<UserResponse, AppError> {
        let user = self
            .repository
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        Ok(UserResponse::from(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::user::repository::InMemoryUserRepository;

    fn service() -> UserService {
        UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            TokenConfig::new(),
            Arc::new(SystemClock::new()),
        )
    }

    fn register_request(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_login_roundtrip() {
        let service = service();

        let user = service
            .register(register_request("alice", "password123"))
            .await
            .unwrap();
        assert_eq!(user.username, "alice");

        let token = service
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();
        assert!(!token.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_register_trims_username() {
        let service = service();

        let user = service
            .register(register_request("  bob  ", "password123"))
            .await
            .unwrap();
        assert_eq!(user.username, "bob");
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let service = service();

        service
            .register(register_request("alice", "password123"))
            .await
            .unwrap();
        let result = service
            .register(register_request("alice", "different-pass"))
            .await;

        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_empty_username() {
        let service = service();
        let result = service.register(register_request("   ", "password123")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_username_limit_counts_characters() {
        let service = service();

        // 32 two-byte characters, within the limit even though it is 64 bytes
        let at_limit = "ż".repeat(32);
        let user = service
            .register(register_request(&at_limit, "password123"))
            .await
            .unwrap();
        assert_eq!(user.username, at_limit);

        let over_limit = "ż".repeat(33);
        let result = service
            .register(register_request(&over_limit, "password123"))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let service = service();
        let result = service.register(register_request("alice", "short")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let service = service();
        service
            .register(register_request("alice", "password123"))
            .await
            .unwrap();

        let result = service
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "wrong-password".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_user_same_error_as_wrong_password() {
        let service = service();
        service
            .register(register_request("alice", "password123"))
            .await
            .unwrap();

        let unknown = service
            .login(LoginRequest {
                username: "mallory".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap_err();
        let wrong = service
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "nope-nope-nope".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_profile_of_registered_user() {
        let service = service();
        let registered = service
            .register(register_request("alice", "password123"))
            .await
            .unwrap();

        let profile = service.profile(registered.id).await.unwrap();
        assert_eq!(profile, registered);
    }

    #[tokio::test]
    async fn test_profile_of_unknown_user() {
        let service = service();
        let result = service.profile(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
