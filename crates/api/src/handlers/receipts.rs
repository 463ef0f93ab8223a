use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use flashdeck_iap::VerifyRequest;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/receipts/verify
///
/// Requires `platform` and `receiptData`. A rejected receipt is a 200 with
/// `valid: false`; a store failure is a 500.
pub async fn verify_receipt(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let request: VerifyRequest = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest("invalid request body".into()))?;

    if request.platform.is_empty() || request.receipt_data.is_empty() {
        return Err(AppError::BadRequest(
            "platform and receiptData required".into(),
        ));
    }

    let result = state.receipts.verify(&request).await?;
    tracing::info!(
        platform = %request.platform,
        deck_id = %request.deck_id,
        valid = result.valid,
        "Receipt verified",
    );

    Ok(Json(result))
}
