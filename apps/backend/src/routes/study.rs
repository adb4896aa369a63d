//! Study endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedOwner;
use crate::AppState;

/// POST /api/decks/:deck_id/items/:item_id/review
pub async fn submit_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedOwner>,
    Path((deck_id, item_id)): Path<(String, String)>,
    payload: std::result::Result<Json<SubmitReviewRequest>, JsonRejection>,
) -> Result<Json<ReviewStateResponse>> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    // Reject unknown ratings before any record is touched
    let rating: Rating = payload.rating.parse()?;

    let now = Utc::now();
    let (tx, current) = state
        .db
        .lock_review_record(&auth.owner, &deck_id, &item_id, now)
        .await?;

    let updated = current.apply_review(rating, now);

    state
        .db
        .save_review(tx, &current, &updated, rating, now)
        .await?;

    tracing::debug!(
        owner = %auth.owner,
        deck_id = %deck_id,
        item_id = %item_id,
        rating = %rating,
        interval = updated.interval,
        repetitions = updated.repetitions,
        ease_factor = updated.ease_factor,
        mastery = updated.mastery_level().as_str(),
        "review applied"
    );

    Ok(Json(ReviewStateResponse::from_record(&updated, now)))
}

/// GET /api/decks/:deck_id/items/:item_id/review
pub async fn get_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedOwner>,
    Path((deck_id, item_id)): Path<(String, String)>,
) -> Result<Json<ReviewStateResponse>> {
    let record = state
        .db
        .get_review_record(&auth.owner, &deck_id, &item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No reviews for item {item_id}")))?;

    Ok(Json(ReviewStateResponse::from_record(&record, Utc::now())))
}

/// GET /api/decks/:deck_id/due
pub async fn due_queue(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedOwner>,
    Path(deck_id): Path<String>,
    Query(query): Query<DueQueueQuery>,
) -> Result<Json<DueQueueResponse>> {
    let limit = query.limit.unwrap_or(state.config.due_queue_limit);
    if limit == 0 {
        return Err(ApiError::BadRequest("limit must be positive".to_string()));
    }

    let records = state.db.get_deck_records(&auth.owner, &deck_id).await?;

    // Due status is evaluated against the clock now, never stored
    let now = Utc::now();
    let (due, _) = review_core::partition_due(&records, now);
    let due_count = due.len();
    let items = review_core::due_items(&records, now, limit)
        .into_iter()
        .map(|r| ReviewStateResponse::from_record(r, now))
        .collect();

    Ok(Json(DueQueueResponse {
        deck_id,
        due_count,
        items,
    }))
}

/// GET /api/decks/:deck_id/items/:item_id/history
pub async fn review_history(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedOwner>,
    Path((deck_id, item_id)): Path<(String, String)>,
) -> Result<Json<ReviewHistoryResponse>> {
    let events = state
        .db
        .get_review_events(&auth.owner, &deck_id, &item_id)
        .await?;
    Ok(Json(ReviewHistoryResponse { events }))
}
