// Public API - what other modules can use
pub use handlers::{login, me, register};
pub use types::{LoginRequest, RegisterRequest, TokenResponse, UserResponse};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
mod types;
