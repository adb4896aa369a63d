//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up test environment with database
//! - Helper functions for owner headers and cleanup
//!
//! # Requirements
//! Tests built with `TestContext::new` require a PostgreSQL database
//! (set DATABASE_URL env var). `TestContext::offline` never connects and is
//! only suitable for requests rejected before any query runs.

pub mod fixtures;

use std::sync::Arc;

use axum::http::HeaderName;
use axum::Router;
use uuid::Uuid;

use review_scheduler_backend::config::Config;
use review_scheduler_backend::db::Database;
use review_scheduler_backend::{router, AppState};

/// Test context containing database connection and test router.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let config = Config::from_env().expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&config.database_url, config.max_connections)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        Self::with_database(db, config)
    }

    /// Create a test context whose pool never connects.
    pub fn offline() -> Self {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://postgres@127.0.0.1:1/unreachable".to_string()),
            _ => None,
        })
        .expect("offline config");

        let db = Database::connect_lazy(&config.database_url, 1).expect("lazy pool");

        Self::with_database(db, config)
    }

    fn with_database(db: Database, config: Config) -> Self {
        let db = Arc::new(db);
        let state = AppState {
            db: db.clone(),
            config: Arc::new(config),
        };

        Self {
            db,
            app: router(state),
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Generate an owner id unique to one test.
    pub fn unique_owner() -> String {
        format!("test-owner-{}", Uuid::new_v4())
    }

    /// Name of the owner header.
    pub fn owner_header() -> HeaderName {
        HeaderName::from_static("x-owner-id")
    }

    /// Clean up test data for an owner.
    pub async fn cleanup_owner(&self, owner: &str) {
        // review_events cascade from review_records
        let _ = sqlx::query("DELETE FROM review_records WHERE owner = $1")
            .bind(owner)
            .execute(self.db.pool())
            .await;
    }
}
