// Library crate for the prediction game server
// This file exposes the public API for integration tests

pub mod auth;
pub mod clock;
pub mod leaderboard;
pub mod matches;
pub mod prediction;
pub mod routes;
pub mod settlement;
pub mod shared;
pub mod user;
