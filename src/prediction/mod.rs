// Public API - what other modules can use
pub use handlers::{
    create_prediction, list_match_predictions, list_my_predictions, update_prediction,
};
pub use types::{
    CreatePredictionRequest, MatchPredictionEntry, MyPredictionResponse, PredictionResponse,
    UpdatePredictionRequest,
};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
mod types;
pub mod window;
