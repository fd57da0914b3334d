use scorecast::auth::token::TokenConfig;
use scorecast::clock::SystemClock;
use scorecast::matches::repository::{InMemoryMatchRepository, PostgresMatchRepository};
use scorecast::prediction::repository::{InMemoryPredictionRepository, PostgresPredictionRepository};
use scorecast::routes;
use scorecast::settlement::repository::{InMemorySettlementStore, PostgresSettlementStore};
use scorecast::shared::AppState;
use scorecast::user::repository::{InMemoryUserRepository, PostgresUserRepository};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scorecast=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting prediction game server");

    let token_config = TokenConfig::new();
    let clock = Arc::new(SystemClock::new());

    // Create shared application state with dependency injection.
    // DATABASE_URL selects PostgreSQL; without it everything runs in memory.
    let state = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = sqlx::PgPool::connect(&database_url)
                .await
                .expect("Failed to connect to database");
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("Failed to run database migrations");
            info!("Connected to PostgreSQL");

            AppState::new(
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresMatchRepository::new(pool.clone())),
                Arc::new(PostgresPredictionRepository::new(pool.clone())),
                Arc::new(PostgresSettlementStore::new(pool)),
                clock,
                token_config,
            )
        }
        Err(_) => {
            info!("DATABASE_URL not set, using in-memory repositories");

            // The in-memory settlement store shares storage with the
            // match and prediction repositories
            let match_repository = Arc::new(InMemoryMatchRepository::new());
            let prediction_repository = Arc::new(InMemoryPredictionRepository::new());
            let settlement_store = Arc::new(InMemorySettlementStore::new(
                match_repository.clone(),
                prediction_repository.clone(),
            ));

            AppState::new(
                Arc::new(InMemoryUserRepository::new()),
                match_repository,
                prediction_repository,
                settlement_store,
                clock,
                token_config,
            )
        }
    };

    let app = routes::app(state);

    // run our app with hyper, listening globally
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .unwrap();
    info!("Server running on http://localhost:{}", port);
    axum::serve(listener, app).await.unwrap();
}
