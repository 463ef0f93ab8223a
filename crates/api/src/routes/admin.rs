use axum::routing::put;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Admin routes mounted at `/admin`. Unauthenticated; intended for seeding.
///
/// ```text
/// PUT    /decks/{id}        -> put_deck
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/decks/{id}", put(admin::put_deck))
}
