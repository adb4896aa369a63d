//! PostgreSQL database operations

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, Transaction};

use crate::error::{ApiError, Result};
use crate::models::*;

const RECORD_COLUMNS: &str = r#"
    owner, deck_id, item_id, ease_factor, interval_days, repetitions,
    next_review_date, last_review_date, last_review_rating,
    total_reviews, correct_reviews, mastery_level, version, created_at, updated_at
"#;

/// Open transaction holding the row lock of one review record
pub type ReviewTransaction = Transaction<'static, Postgres>;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a pool that only connects on first use
    pub fn connect_lazy(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(database_url)?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Review Record Repository ===

    /// Get the review record of one item
    pub async fn get_review_record(
        &self,
        owner: &str,
        deck_id: &str,
        item_id: &str,
    ) -> Result<Option<ReviewRecord>> {
        let record = sqlx::query_as::<_, DbReviewRecord>(&format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM review_records
            WHERE owner = $1 AND deck_id = $2 AND item_id = $3
            "#
        ))
        .bind(owner)
        .bind(deck_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        record.map(|r| r.to_core()).transpose()
    }

    /// Get all review records of a deck
    pub async fn get_deck_records(&self, owner: &str, deck_id: &str) -> Result<Vec<ReviewRecord>> {
        let records = sqlx::query_as::<_, DbReviewRecord>(&format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM review_records
            WHERE owner = $1 AND deck_id = $2
            ORDER BY next_review_date, item_id
            "#
        ))
        .bind(owner)
        .bind(deck_id)
        .fetch_all(&self.pool)
        .await?;

        records.iter().map(DbReviewRecord::to_core).collect()
    }

    /// Begin a review: fetch-or-create the record and lock its row.
    ///
    /// The returned transaction holds the row lock until it is passed to
    /// [`Database::save_review`] or dropped, so concurrent submissions for the
    /// same item are applied one after another.
    pub async fn lock_review_record(
        &self,
        owner: &str,
        deck_id: &str,
        item_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(ReviewTransaction, ReviewRecord)> {
        let mut tx = self.pool.begin().await?;

        let zero = DbReviewRecord::from_core(&ReviewRecord::new(owner, deck_id, item_id, now));
        sqlx::query(
            r#"
            INSERT INTO review_records (owner, deck_id, item_id, ease_factor, interval_days,
                                        repetitions, next_review_date, mastery_level)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (owner, deck_id, item_id) DO NOTHING
            "#,
        )
        .bind(&zero.owner)
        .bind(&zero.deck_id)
        .bind(&zero.item_id)
        .bind(zero.ease_factor)
        .bind(zero.interval_days)
        .bind(zero.repetitions)
        .bind(zero.next_review_date)
        .bind(&zero.mastery_level)
        .execute(&mut *tx)
        .await?;

        let locked = sqlx::query_as::<_, DbReviewRecord>(&format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM review_records
            WHERE owner = $1 AND deck_id = $2 AND item_id = $3
            FOR UPDATE
            "#
        ))
        .bind(owner)
        .bind(deck_id)
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        let record = locked.to_core()?;
        Ok((tx, record))
    }

    /// Write the updated record and its audit row, then commit
    pub async fn save_review(
        &self,
        mut tx: ReviewTransaction,
        previous: &ReviewRecord,
        updated: &ReviewRecord,
        rating: Rating,
        reviewed_at: DateTime<Utc>,
    ) -> Result<()> {
        let row = DbReviewRecord::from_core(updated);
        sqlx::query(
            r#"
            UPDATE review_records SET
                ease_factor = $4,
                interval_days = $5,
                repetitions = $6,
                next_review_date = $7,
                last_review_date = $8,
                last_review_rating = $9,
                total_reviews = $10,
                correct_reviews = $11,
                mastery_level = $12,
                version = version + 1,
                updated_at = NOW()
            WHERE owner = $1 AND deck_id = $2 AND item_id = $3
            "#,
        )
        .bind(&row.owner)
        .bind(&row.deck_id)
        .bind(&row.item_id)
        .bind(row.ease_factor)
        .bind(row.interval_days)
        .bind(row.repetitions)
        .bind(row.next_review_date)
        .bind(row.last_review_date)
        .bind(&row.last_review_rating)
        .bind(row.total_reviews)
        .bind(row.correct_reviews)
        .bind(&row.mastery_level)
        .execute(&mut *tx)
        .await?;

        let event = DbReviewEvent::new(previous, updated, rating, reviewed_at);
        sqlx::query(
            r#"
            INSERT INTO review_events (id, owner, deck_id, item_id, rating, interval_before,
                                       interval_after, ease_before, ease_after, reviewed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(event.id)
        .bind(&event.owner)
        .bind(&event.deck_id)
        .bind(&event.item_id)
        .bind(&event.rating)
        .bind(event.interval_before)
        .bind(event.interval_after)
        .bind(event.ease_before)
        .bind(event.ease_after)
        .bind(event.reviewed_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Get the audit trail of one item, oldest first
    pub async fn get_review_events(
        &self,
        owner: &str,
        deck_id: &str,
        item_id: &str,
    ) -> Result<Vec<DbReviewEvent>> {
        let events = sqlx::query_as::<_, DbReviewEvent>(
            r#"
            SELECT id, owner, deck_id, item_id, rating, interval_before, interval_after,
                   ease_before, ease_after, reviewed_at
            FROM review_events
            WHERE owner = $1 AND deck_id = $2 AND item_id = $3
            ORDER BY reviewed_at, id
            "#,
        )
        .bind(owner)
        .bind(deck_id)
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Delete every review record of a deck (deck deleted upstream)
    pub async fn delete_deck_records(&self, owner: &str, deck_id: &str) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM review_records
            WHERE owner = $1 AND deck_id = $2
            "#,
        )
        .bind(owner)
        .bind(deck_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete the review record of one item (item deleted upstream)
    pub async fn delete_item_record(&self, owner: &str, deck_id: &str, item_id: &str) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM review_records
            WHERE owner = $1 AND deck_id = $2 AND item_id = $3
            "#,
        )
        .bind(owner)
        .bind(deck_id)
        .bind(item_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
