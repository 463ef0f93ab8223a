use axum::routing::post;
use axum::Router;

use crate::handlers::receipts;
use crate::state::AppState;

/// Receipt routes mounted at `/receipts`.
///
/// ```text
/// POST   /verify            -> verify_receipt
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/verify", post(receipts::verify_receipt))
}
