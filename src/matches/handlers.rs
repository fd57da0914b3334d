use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::MatchService,
    types::{CreateMatchRequest, MatchResponse},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for scheduling a new match
///
/// POST /matches
/// Returns the created match
#[instrument(name = "create_match", skip(state, request))]
pub async fn create_match(
    State(state): State<AppState>,
    Json(request): Json<CreateMatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    info!(
        home_team = %request.home_team,
        away_team = %request.away_team,
        "Creating new match"
    );

    let service = MatchService::new(Arc::clone(&state.match_repository), Arc::clone(&state.clock));
    let fixture = service.create_match(request).await?;

    Ok(Json(fixture))
}

/// HTTP handler for listing matches
///
/// GET /matches
/// Returns all matches ordered by kickoff time ascending
#[instrument(name = "list_matches", skip(state))]
pub async fn list_matches(
    State(state): State<AppState>,
) -> Result<Json<Vec<MatchResponse>>, AppError> {
    let service = MatchService::new(Arc::clone(&state.match_repository), Arc::clone(&state.clock));
    let matches = service.list_matches().await?;

    info!(match_count = matches.len(), "Matches listed successfully");

    Ok(Json(matches))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::post,
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    fn app() -> Router {
        let state = AppStateBuilder::new().build();
        Router::new()
            .route("/matches", post(create_match).get(list_matches))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_create_match_handler() {
        let app = app();

        let request_body = r#"{
            "home_team": "Poland",
            "away_team": "Germany",
            "start_time": "2026-06-12T18:00:00Z",
            "group_name": "A"
        }"#;
        let request = Request::builder()
            .method("POST")
            .uri("/matches")
            .header("content-type", "application/json")
            .body(Body::from(request_body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let fixture: MatchResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(fixture.home_team, "Poland");
        assert_eq!(fixture.away_team, "Germany");
        assert_eq!(fixture.stage, "group");
        assert_eq!(fixture.group_name, Some("A".to_string()));
        assert!(!fixture.is_finished);
    }

    #[tokio::test]
    async fn test_create_match_naive_timestamp_rejected() {
        let app = app();

        // No offset on start_time
        let request_body = r#"{
            "home_team": "Poland",
            "away_team": "Germany",
            "start_time": "2026-06-12T18:00:00"
        }"#;
        let request = Request::builder()
            .method("POST")
            .uri("/matches")
            .header("content-type", "application/json")
            .body(Body::from(request_body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_create_match_blank_team_rejected() {
        let app = app();

        let request_body = r#"{
            "home_team": "",
            "away_team": "Germany",
            "start_time": "2026-06-12T18:00:00Z"
        }"#;
        let request = Request::builder()
            .method("POST")
            .uri("/matches")
            .header("content-type", "application/json")
            .body(Body::from(request_body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_matches_handler_empty() {
        let app = app();

        let request = Request::builder()
            .method("GET")
            .uri("/matches")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let matches: Vec<MatchResponse> = serde_json::from_slice(&body).unwrap();
        assert!(matches.is_empty());
    }
}
