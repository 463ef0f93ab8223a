pub mod admin;
pub mod decks;
pub mod health;
pub mod receipts;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /catalog                        deck catalog
///
/// /decks/{id}                     full deck
/// /decks/{id}/preview             first cards of a deck
/// /decks/{id}/generate            start media generation (POST)
/// /decks/{id}/status              generation progress
/// /decks/{id}/download            receipt-gated deck download (POST)
///
/// /receipts/verify                verify a store receipt (POST)
///
/// /admin/decks/{id}               create or replace a deck (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(decks::catalog_router())
        .nest("/decks", decks::router())
        .nest("/receipts", receipts::router())
        .nest("/admin", admin::router())
}
