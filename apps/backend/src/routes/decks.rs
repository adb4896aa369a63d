//! Deck endpoints

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedOwner;
use crate::AppState;

/// GET /api/decks/:deck_id/due-set
pub async fn due_set(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedOwner>,
    Path(deck_id): Path<String>,
    Query(query): Query<DueSetQuery>,
) -> Result<Json<DueSetResponse>> {
    let records = state.db.get_deck_records(&auth.owner, &deck_id).await?;

    let now = Utc::now();
    let mut due_set = DueSet::compute(&records, now);
    if let Some(total_items) = query.total_items {
        due_set = due_set.with_total_items(total_items);
    }

    Ok(Json(DueSetResponse {
        deck_id,
        generated_at: now,
        due_set,
    }))
}

/// DELETE /api/decks/:deck_id/reviews
pub async fn delete_deck_reviews(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedOwner>,
    Path(deck_id): Path<String>,
) -> Result<Json<DeleteReviewsResponse>> {
    let deleted = state.db.delete_deck_records(&auth.owner, &deck_id).await?;
    tracing::info!(owner = %auth.owner, deck_id = %deck_id, deleted, "deck review records deleted");
    Ok(Json(DeleteReviewsResponse { deleted }))
}

/// DELETE /api/decks/:deck_id/items/:item_id/reviews
pub async fn delete_item_reviews(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedOwner>,
    Path((deck_id, item_id)): Path<(String, String)>,
) -> Result<Json<DeleteReviewsResponse>> {
    let deleted = state
        .db
        .delete_item_record(&auth.owner, &deck_id, &item_id)
        .await?;
    tracing::info!(owner = %auth.owner, deck_id = %deck_id, item_id = %item_id, deleted, "item review record deleted");
    Ok(Json(DeleteReviewsResponse { deleted }))
}
