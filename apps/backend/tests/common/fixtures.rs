//! Test fixtures and factory functions for creating test data.

use serde_json::json;
use uuid::Uuid;

/// Create a submit review request body.
pub fn submit_review_request(rating: &str) -> serde_json::Value {
    json!({ "rating": rating })
}

/// Path of the review endpoint for one item.
pub fn review_path(deck_id: &str, item_id: &str) -> String {
    format!("/api/decks/{deck_id}/items/{item_id}/review")
}

/// Path of the history endpoint for one item.
pub fn history_path(deck_id: &str, item_id: &str) -> String {
    format!("/api/decks/{deck_id}/items/{item_id}/history")
}

/// Path of the due-set endpoint for a deck.
pub fn due_set_path(deck_id: &str) -> String {
    format!("/api/decks/{deck_id}/due-set")
}

/// Path of the due queue endpoint for a deck.
pub fn due_queue_path(deck_id: &str) -> String {
    format!("/api/decks/{deck_id}/due")
}

/// Generate a unique test deck id to avoid collisions.
pub fn unique_deck_id(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().to_string()[..8])
}
