pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url, config.max_connections).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let addr = config.bind_addr();
    let state = AppState {
        db: Arc::new(db),
        config: Arc::new(config),
    };

    let app = router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let owner_routes = Router::new()
        // Review routes
        .route(
            "/api/decks/:deck_id/items/:item_id/review",
            post(routes::study::submit_review).get(routes::study::get_review),
        )
        .route(
            "/api/decks/:deck_id/items/:item_id/history",
            get(routes::study::review_history),
        )
        .route("/api/decks/:deck_id/due", get(routes::study::due_queue))
        // Deck routes
        .route("/api/decks/:deck_id/due-set", get(routes::decks::due_set))
        .route(
            "/api/decks/:deck_id/reviews",
            delete(routes::decks::delete_deck_reviews),
        )
        .route(
            "/api/decks/:deck_id/items/:item_id/reviews",
            delete(routes::decks::delete_item_reviews),
        )
        .layer(middleware::from_fn(routes::auth::owner_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(owner_routes)
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
