use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{auth, leaderboard, matches, prediction, settlement, shared::AppState, user};

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the application router
///
/// Everything except registration, login and the health probe sits behind
/// the JWT middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/me", get(user::me))
        .route(
            "/matches",
            get(matches::list_matches).post(matches::create_match),
        )
        .route(
            "/matches/:match_id/predictions",
            get(prediction::list_match_predictions),
        )
        .route("/predictions", post(prediction::create_prediction))
        .route(
            "/predictions/:prediction_id",
            put(prediction::update_prediction),
        )
        .route("/my-predictions", get(prediction::list_my_predictions))
        .route("/leaderboard", get(leaderboard::leaderboard))
        .route(
            "/admin/matches/:match_id/result",
            put(settlement::record_result),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::jwt_auth,
        ))
        .route("/health", get(health))
        .route("/register", post(user::register))
        .route("/login", post(user::login))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
