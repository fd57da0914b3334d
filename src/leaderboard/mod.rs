// Public API - what other modules can use
pub use handlers::leaderboard;
pub use types::LeaderboardEntry;

// Internal modules
mod handlers;
pub mod service;
mod types;
