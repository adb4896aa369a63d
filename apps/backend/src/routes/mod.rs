//! HTTP route handlers

pub mod auth;
pub mod decks;
pub mod study;
