//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{ApiError, Result};

// Re-export shared types from review-core
pub use review_core::{DueSet, MasteryLevel, Rating, ReviewRecord};

// === Database Entity Types ===

/// Review record stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReviewRecord {
    pub owner: String,
    pub deck_id: String,
    pub item_id: String,
    pub ease_factor: f64,
    pub interval_days: i64,
    pub repetitions: i64,
    pub next_review_date: DateTime<Utc>,
    pub last_review_date: Option<DateTime<Utc>>,
    pub last_review_rating: Option<String>,
    pub total_reviews: i64,
    pub correct_reviews: i64,
    pub mastery_level: String,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbReviewRecord {
    /// Create from review-core ReviewRecord
    pub fn from_core(record: &ReviewRecord) -> Self {
        let now = Utc::now();
        Self {
            owner: record.owner.clone(),
            deck_id: record.deck_id.clone(),
            item_id: record.item_id.clone(),
            ease_factor: record.ease_factor,
            interval_days: i64::from(record.interval),
            repetitions: i64::from(record.repetitions),
            next_review_date: record.next_review_date,
            last_review_date: record.last_review_date,
            last_review_rating: record.last_review_rating.map(|r| r.as_str().to_string()),
            total_reviews: i64::from(record.total_reviews),
            correct_reviews: i64::from(record.correct_reviews),
            mastery_level: record.mastery_level().as_str().to_string(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Convert to review-core ReviewRecord.
    ///
    /// The stored mastery level is ignored; it is re-derived from
    /// repetitions and interval.
    pub fn to_core(&self) -> Result<ReviewRecord> {
        let last_review_rating = self
            .last_review_rating
            .as_deref()
            .map(str::parse::<Rating>)
            .transpose()
            .map_err(|e| ApiError::Internal(format!("corrupt review record: {e}")))?;

        Ok(ReviewRecord {
            owner: self.owner.clone(),
            deck_id: self.deck_id.clone(),
            item_id: self.item_id.clone(),
            ease_factor: self.ease_factor,
            interval: column_u32("interval_days", self.interval_days)?,
            repetitions: column_u32("repetitions", self.repetitions)?,
            next_review_date: self.next_review_date,
            last_review_date: self.last_review_date,
            last_review_rating,
            total_reviews: column_u32("total_reviews", self.total_reviews)?,
            correct_reviews: column_u32("correct_reviews", self.correct_reviews)?,
        })
    }
}

fn column_u32(column: &str, value: i64) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| ApiError::Internal(format!("corrupt review record: {column} = {value}")))
}

/// Audit row for a submitted review
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReviewEvent {
    pub id: Uuid,
    pub owner: String,
    pub deck_id: String,
    pub item_id: String,
    pub rating: String,
    pub interval_before: i64,
    pub interval_after: i64,
    pub ease_before: f64,
    pub ease_after: f64,
    pub reviewed_at: DateTime<Utc>,
}

impl DbReviewEvent {
    pub fn new(previous: &ReviewRecord, updated: &ReviewRecord, rating: Rating, reviewed_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: updated.owner.clone(),
            deck_id: updated.deck_id.clone(),
            item_id: updated.item_id.clone(),
            rating: rating.as_str().to_string(),
            interval_before: i64::from(previous.interval),
            interval_after: i64::from(updated.interval),
            ease_before: previous.ease_factor,
            ease_after: updated.ease_factor,
            reviewed_at,
        }
    }
}

// === API Request/Response Types ===

/// Review submission body. The rating is kept as a raw string so unknown
/// symbols surface as `invalid_rating` instead of a generic body rejection.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitReviewRequest {
    pub rating: String,
}

/// Review state of one item as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewStateResponse {
    pub deck_id: String,
    pub item_id: String,
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
    pub next_review_date: DateTime<Utc>,
    pub mastery_level: MasteryLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review_rating: Option<Rating>,
    pub total_reviews: u32,
    pub correct_reviews: u32,
    pub accuracy_percent: u32,
    pub is_due: bool,
}

impl ReviewStateResponse {
    pub fn from_record(record: &ReviewRecord, now: DateTime<Utc>) -> Self {
        Self {
            deck_id: record.deck_id.clone(),
            item_id: record.item_id.clone(),
            ease_factor: record.ease_factor,
            interval: record.interval,
            repetitions: record.repetitions,
            next_review_date: record.next_review_date,
            mastery_level: record.mastery_level(),
            last_review_date: record.last_review_date,
            last_review_rating: record.last_review_rating,
            total_reviews: record.total_reviews,
            correct_reviews: record.correct_reviews,
            accuracy_percent: record.accuracy_percent(),
            is_due: record.is_due(now),
        }
    }
}

/// Query parameters for the due-set endpoint
#[derive(Debug, Default, Deserialize)]
pub struct DueSetQuery {
    /// Number of items in the deck, when the caller knows it
    pub total_items: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DueSetResponse {
    pub deck_id: String,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub due_set: DueSet,
}

/// Query parameters for the due queue
#[derive(Debug, Default, Deserialize)]
pub struct DueQueueQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DueQueueResponse {
    pub deck_id: String,
    pub due_count: usize,
    pub items: Vec<ReviewStateResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewHistoryResponse {
    pub events: Vec<DbReviewEvent>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteReviewsResponse {
    pub deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn reviewed_record() -> ReviewRecord {
        ReviewRecord::new("owner-1", "deck-1", "item-1", now())
            .apply_review(Rating::Good, now())
            .apply_review(Rating::Good, now())
    }

    #[test]
    fn test_db_record_round_trip() {
        let record = reviewed_record();
        let db = DbReviewRecord::from_core(&record);

        assert_eq!(db.interval_days, 6);
        assert_eq!(db.mastery_level, "young");
        assert_eq!(db.last_review_rating.as_deref(), Some("good"));
        assert_eq!(db.to_core().unwrap(), record);
    }

    #[test]
    fn test_stored_mastery_level_is_ignored() {
        let mut db = DbReviewRecord::from_core(&reviewed_record());
        db.mastery_level = "mastered".to_string();

        assert_eq!(db.to_core().unwrap().mastery_level(), MasteryLevel::Young);
    }

    #[test]
    fn test_corrupt_rating_is_rejected() {
        let mut db = DbReviewRecord::from_core(&reviewed_record());
        db.last_review_rating = Some("great".to_string());

        assert!(matches!(db.to_core(), Err(ApiError::Internal(_))));
    }

    #[test]
    fn test_negative_counter_is_rejected() {
        let mut db = DbReviewRecord::from_core(&reviewed_record());
        db.total_reviews = -1;

        assert!(matches!(db.to_core(), Err(ApiError::Internal(_))));
    }

    #[test]
    fn test_review_event_captures_before_and_after() {
        let previous = reviewed_record();
        let updated = previous.apply_review(Rating::Again, now());
        let event = DbReviewEvent::new(&previous, &updated, Rating::Again, now());

        assert_eq!(event.interval_before, 6);
        assert_eq!(event.interval_after, 1);
        assert_eq!(event.rating, "again");
        assert!(event.ease_after < event.ease_before);
    }

    #[test]
    fn test_state_response_serializes_mastery() {
        let response = ReviewStateResponse::from_record(&reviewed_record(), now());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["mastery_level"], "young");
        assert_eq!(json["interval"], 6);
        assert_eq!(json["accuracy_percent"], 100);
        assert_eq!(json["is_due"], false);
    }
}
