use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use flashdeck_core::error::CoreError;
use flashdeck_core::models::{validate_deck_id, Deck};

use crate::error::AppResult;
use crate::state::AppState;

/// PUT /api/admin/decks/{id}
///
/// Create or replace a deck and persist it. The body's `id` must match the
/// path.
pub async fn put_deck(
    State(state): State<AppState>,
    Path(deck_id): Path<String>,
    Json(deck): Json<Deck>,
) -> AppResult<impl IntoResponse> {
    validate_deck_id(&deck_id)?;
    if deck.id != deck_id {
        return Err(CoreError::Validation(format!(
            "Deck id '{}' does not match path '{deck_id}'",
            deck.id
        ))
        .into());
    }

    let deck = state.generator.create_deck(deck).await?;
    Ok(Json(deck))
}
