//! Route definitions for the catalog and per-deck endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::decks;
use crate::state::AppState;

/// Catalog route mounted at the `/api` root.
///
/// ```text
/// GET    /catalog           -> get_catalog
/// ```
pub fn catalog_router() -> Router<AppState> {
    Router::new().route("/catalog", get(decks::get_catalog))
}

/// Deck routes mounted at `/decks`.
///
/// ```text
/// GET    /{id}              -> get_deck
/// GET    /{id}/preview      -> get_deck_preview
/// POST   /{id}/generate     -> start_generation
/// GET    /{id}/status       -> get_status
/// POST   /{id}/download     -> download_deck
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(decks::get_deck))
        .route("/{id}/preview", get(decks::get_deck_preview))
        .route("/{id}/generate", post(decks::start_generation))
        .route("/{id}/status", get(decks::get_status))
        .route("/{id}/download", post(decks::download_deck))
}
