use serde::{Deserialize, Serialize};

/// A receipt verification request, as posted by the mobile clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// `ios` or `android` (case-insensitive).
    #[serde(default)]
    pub platform: String,
    /// Base64 receipt (iOS) or purchase token (Android).
    #[serde(default)]
    pub receipt_data: String,
    /// Product the receipt is expected to contain.
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub deck_id: String,
}

/// Outcome of a receipt check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerifyResponse {
    /// A valid result for `deck_id`, optionally naming the matched product.
    pub fn valid(deck_id: impl Into<String>, product_id: Option<String>) -> Self {
        Self {
            valid: true,
            deck_id: Some(deck_id.into()),
            product_id: product_id.filter(|p| !p.is_empty()),
            error: None,
        }
    }

    /// An invalid result carrying a human-readable reason.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            deck_id: None,
            product_id: None,
            error: Some(reason.into()),
        }
    }
}
