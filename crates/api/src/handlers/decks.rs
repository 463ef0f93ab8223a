//! Handlers for the catalog, deck reads, generation, and downloads.

use std::collections::HashSet;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use flashdeck_core::error::CoreError;
use flashdeck_core::models::GenerateRequest;
use flashdeck_iap::VerifyRequest;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::optional_json;
use crate::state::AppState;

/// Optional body of `POST /api/decks/{id}/download`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    #[serde(default)]
    pub receipt_data: String,
    #[serde(default)]
    pub platform: String,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/catalog
pub async fn get_catalog(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.generator.get_catalog().await)
}

/// GET /api/decks/{id}/preview
pub async fn get_deck_preview(
    State(state): State<AppState>,
    Path(deck_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let preview = state.generator.get_deck_preview(&deck_id).await?;
    Ok(Json(preview))
}

/// GET /api/decks/{id}
pub async fn get_deck(
    State(state): State<AppState>,
    Path(deck_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deck = state.generator.get_deck(&deck_id).await?;
    Ok(Json(deck))
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// POST /api/decks/{id}/generate
///
/// Starts a background run and returns 202 with the fresh status. The body
/// is optional; `{"cards": [{"id": ...}]}` restricts the run to those cards.
pub async fn start_generation(
    State(state): State<AppState>,
    Path(deck_id): Path<String>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let request: GenerateRequest = optional_json(&body);
    let status = state.generator.start_generation(&deck_id, request).await?;

    Ok((StatusCode::ACCEPTED, Json(status)))
}

/// GET /api/decks/{id}/status
pub async fn get_status(
    State(state): State<AppState>,
    Path(deck_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let status = state.generator.get_status(&deck_id).await?;
    Ok(Json(status))
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

/// POST /api/decks/{id}/download
///
/// Free decks are returned directly. Paid decks need a receipt: a missing
/// receipt or a store failure is 402, a rejected receipt is 403.
pub async fn download_deck(
    State(state): State<AppState>,
    Path(deck_id): Path<String>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let deck = state.generator.get_deck(&deck_id).await?;
    let pricing = state.generator.pricing();

    if !pricing.is_free(&deck) {
        let download: DownloadRequest = optional_json(&body);
        let request = VerifyRequest {
            platform: download.platform,
            receipt_data: download.receipt_data,
            product_id: pricing.product_id(&deck_id),
            deck_id: deck_id.clone(),
        };

        // Pricing already decided the deck is paid; an explicit price
        // overrides FREE_DECKS.
        let result = state
            .receipts
            .validate_purchase_for_deck(&request, &HashSet::new())
            .await
            .map_err(|e| CoreError::PaymentRequired(e.to_string()))?;

        if !result.valid {
            let reason = result.error.unwrap_or_else(|| "invalid receipt".into());
            tracing::info!(deck_id = %deck_id, reason = %reason, "Download refused");
            return Err(CoreError::Forbidden(reason).into());
        }
    }

    tracing::info!(deck_id = %deck_id, "Deck downloaded");
    Ok(Json(deck))
}
