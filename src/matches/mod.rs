// Public API - what other modules can use
pub use handlers::{create_match, list_matches};
pub use types::{CreateMatchRequest, MatchResponse};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
mod types;
