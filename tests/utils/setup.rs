use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use scorecast::{
    clock::{Clock, FixedClock},
    matches::repository::InMemoryMatchRepository,
    prediction::repository::InMemoryPredictionRepository,
    routes,
    settlement::repository::InMemorySettlementStore,
    shared::AppState,
    user::repository::InMemoryUserRepository,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// A registered user with a valid bearer token
pub struct Player {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

pub struct TestSetup {
    pub app: Router,
    pub clock: Arc<FixedClock>,
}

pub struct TestSetupBuilder {
    start_time: DateTime<Utc>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            // A pinned instant keeps every kickoff offset reproducible
            start_time: Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[allow(dead_code)]
    pub fn starting_at(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn build(self) -> TestSetup {
        let clock = Arc::new(FixedClock::new(self.start_time));

        let match_repository = Arc::new(InMemoryMatchRepository::new());
        let prediction_repository = Arc::new(InMemoryPredictionRepository::new());
        let settlement_store = Arc::new(InMemorySettlementStore::new(
            match_repository.clone(),
            prediction_repository.clone(),
        ));

        let state = AppState::new(
            Arc::new(InMemoryUserRepository::new()),
            match_repository,
            prediction_repository,
            settlement_store,
            clock.clone(),
            scorecast::auth::token::TokenConfig::new(),
        );

        TestSetup {
            app: routes::app(state),
            clock,
        }
    }
}

impl TestSetup {
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn advance_clock(&self, by: Duration) {
        self.clock.advance(by);
    }

    /// Sends one request through the router and returns status plus parsed
    /// body (null when the body is empty or not JSON)
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, body)
    }

    // ------------------------------------------------------------------
    // User actions
    // ------------------------------------------------------------------

    pub async fn register(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.request(
            "POST",
            "/register",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn register_and_login(&self, username: &str) -> Player {
        let (status, body) = self.register(username, "password123").await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", body);
        let user_id = Uuid::parse_str(body["id"].as_str().unwrap()).unwrap();

        Player {
            user_id,
            username: username.to_string(),
            token: self.login(username, "password123").await,
        }
    }

    // ------------------------------------------------------------------
    // Match and prediction actions
    // ------------------------------------------------------------------

    /// Schedules a match kicking off at the given offset from the test clock
    pub async fn create_match(
        &self,
        token: &str,
        home_team: &str,
        away_team: &str,
        kickoff_in: Duration,
    ) -> Uuid {
        let (status, body) = self
            .request(
                "POST",
                "/matches",
                Some(token),
                Some(json!({
                    "home_team": home_team,
                    "away_team": away_team,
                    "start_time": (self.now() + kickoff_in).to_rfc3339(),
                    "group_name": "A",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create match failed: {}", body);
        Uuid::parse_str(body["id"].as_str().unwrap()).unwrap()
    }

    pub async fn list_matches(&self, token: &str) -> Vec<Value> {
        let (status, body) = self.request("GET", "/matches", Some(token), None).await;
        assert_eq!(status, StatusCode::OK, "list matches failed: {}", body);
        body.as_array().unwrap().clone()
    }

    pub async fn predict(
        &self,
        token: &str,
        match_id: Uuid,
        home_score: i32,
        away_score: i32,
    ) -> (StatusCode, Value) {
        self.request(
            "POST",
            "/predictions",
            Some(token),
            Some(json!({
                "match_id": match_id,
                "home_score": home_score,
                "away_score": away_score,
            })),
        )
        .await
    }

    pub async fn update_prediction(
        &self,
        token: &str,
        prediction_id: Uuid,
        home_score: i32,
        away_score: i32,
    ) -> (StatusCode, Value) {
        self.request(
            "PUT",
            &format!("/predictions/{}", prediction_id),
            Some(token),
            Some(json!({ "home_score": home_score, "away_score": away_score })),
        )
        .await
    }

    pub async fn my_predictions(&self, token: &str) -> Vec<Value> {
        let (status, body) = self
            .request("GET", "/my-predictions", Some(token), None)
            .await;
        assert_eq!(status, StatusCode::OK, "my predictions failed: {}", body);
        body.as_array().unwrap().clone()
    }

    pub async fn match_predictions(&self, token: &str, match_id: Uuid) -> (StatusCode, Value) {
        self.request(
            "GET",
            &format!("/matches/{}/predictions", match_id),
            Some(token),
            None,
        )
        .await
    }

    // ------------------------------------------------------------------
    // Settlement and leaderboard actions
    // ------------------------------------------------------------------

    pub async fn record_result(
        &self,
        token: &str,
        match_id: Uuid,
        home_score: i32,
        away_score: i32,
    ) -> (StatusCode, Value) {
        self.request(
            "PUT",
            &format!("/admin/matches/{}/result", match_id),
            Some(token),
            Some(json!({ "home_score": home_score, "away_score": away_score })),
        )
        .await
    }

    pub async fn leaderboard(&self, token: &str) -> Vec<Value> {
        let (status, body) = self.request("GET", "/leaderboard", Some(token), None).await;
        assert_eq!(status, StatusCode::OK, "leaderboard failed: {}", body);
        body.as_array().unwrap().clone()
    }
}
