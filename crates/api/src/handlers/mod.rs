pub mod admin;
pub mod decks;
pub mod receipts;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

/// Parse an optional JSON body. An empty or malformed body yields the
/// default value.
pub(crate) fn optional_json<T: DeserializeOwned + Default>(body: &Bytes) -> T {
    if body.iter().all(u8::is_ascii_whitespace) {
        return T::default();
    }
    serde_json::from_slice(body).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Ignoring malformed optional body");
        T::default()
    })
}
