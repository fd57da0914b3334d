// Public API - what other modules can use
pub use handlers::record_result;
pub use types::{MatchResultRequest, SettledPredictionResponse, SettlementResponse};

// Internal modules
mod handlers;
pub mod repository;
pub mod scoring;
pub mod service;
mod types;
