use std::sync::Arc;

use flashdeck_iap::ReceiptValidator;

use crate::engine::DeckGenerator;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Deck registry and media generation engine.
    pub generator: Arc<DeckGenerator>,
    /// Purchase receipt validator.
    pub receipts: Arc<ReceiptValidator>,
}
