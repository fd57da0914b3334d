use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    service::SettlementService,
    types::{MatchResultRequest, SettlementResponse},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for recording a match result
///
/// PUT /admin/matches/:match_id/result
/// Records the final score and returns the awarded points per prediction
#[instrument(name = "record_result", skip(state, request))]
pub async fn record_result(
    State(state): State<AppState>,
    Path(match_id): Path<Uuid>,
    Json(request): Json<MatchResultRequest>,
) -> Result<Json<SettlementResponse>, AppError> {
    info!(
        match_id = %match_id,
        home_score = request.home_score,
        away_score = request.away_score,
        "Recording match result"
    );

    let service = SettlementService::new(Arc::clone(&state.settlement_store));
    let settlement = service.settle_match(match_id, request).await?;

    Ok(Json(settlement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::models::MatchModel;
    use crate::prediction::models::PredictionModel;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::put,
        Router,
    };
    use chrono::{Duration, Utc};
    use tower::ServiceExt; // for `oneshot`

    fn app() -> (Router, AppState) {
        let state = AppStateBuilder::new().build();
        let app = Router::new()
            .route("/admin/matches/:match_id/result", put(record_result))
            .with_state(state.clone());
        (app, state)
    }

    async fn seed_match(state: &AppState) -> MatchModel {
        let fixture = MatchModel::new(
            "Poland".to_string(),
            "Germany".to_string(),
            Utc::now() - Duration::hours(2),
            "group".to_string(),
            Some("A".to_string()),
            Utc::now() - Duration::days(1),
        );
        state.match_repository.create_match(&fixture).await.unwrap();
        fixture
    }

    fn result_request(match_id: Uuid, body: &str) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(format!("/admin/matches/{}/result", match_id))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_record_result_handler() {
        let (app, state) = app();
        let fixture = seed_match(&state).await;

        let prediction =
            PredictionModel::new(Uuid::new_v4(), fixture.id, 3, 1, Utc::now());
        state
            .prediction_repository
            .try_create(&prediction)
            .await
            .unwrap();

        let response = app
            .oneshot(result_request(
                fixture.id,
                r#"{"home_score": 3, "away_score": 1}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let settlement: SettlementResponse =
            serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(settlement.match_id, fixture.id);
        assert_eq!(settlement.predictions.len(), 1);
        assert_eq!(settlement.predictions[0].points, 2);
    }

    #[tokio::test]
    async fn test_record_result_handler_unknown_match() {
        let (app, _) = app();

        let response = app
            .oneshot(result_request(
                Uuid::new_v4(),
                r#"{"home_score": 1, "away_score": 0}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_record_result_handler_replay_is_conflict() {
        let (app, state) = app();
        let fixture = seed_match(&state).await;

        let response = app
            .clone()
            .oneshot(result_request(
                fixture.id,
                r#"{"home_score": 2, "away_score": 2}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(result_request(
                fixture.id,
                r#"{"home_score": 0, "away_score": 0}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let error = body_json(response).await;
        assert_eq!(error["error"], "Match result has already been recorded");
    }
}
