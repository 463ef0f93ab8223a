//! Google Play purchase verification.
//!
//! Placeholder: purchase tokens are not checked against the Play Developer
//! API. Sandbox mode accepts everything; otherwise any non-empty token is
//! accepted.

use async_trait::async_trait;

use crate::error::IapError;
use crate::models::{VerifyRequest, VerifyResponse};
use crate::validator::ReceiptVerifier;

pub struct GooglePlayVerifier {
    // TODO: verify tokens via purchases.products.get using this package name
    // and a service account.
    package_name: String,
    sandbox: bool,
}

impl GooglePlayVerifier {
    pub fn new(package_name: impl Into<String>, sandbox: bool) -> Self {
        Self {
            package_name: package_name.into(),
            sandbox,
        }
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }
}

#[async_trait]
impl ReceiptVerifier for GooglePlayVerifier {
    async fn verify(&self, request: &VerifyRequest) -> Result<VerifyResponse, IapError> {
        if !self.sandbox && request.receipt_data.is_empty() {
            return Ok(VerifyResponse::invalid("empty receipt data"));
        }

        tracing::debug!(
            package = %self.package_name,
            deck_id = %request.deck_id,
            sandbox = self.sandbox,
            "Accepting Google Play purchase without store verification"
        );
        Ok(VerifyResponse::valid(
            request.deck_id.clone(),
            Some(request.product_id.clone()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(receipt: &str) -> VerifyRequest {
        VerifyRequest {
            platform: "android".into(),
            receipt_data: receipt.into(),
            product_id: "deck.spanish-verbs".into(),
            deck_id: "spanish-verbs".into(),
        }
    }

    #[tokio::test]
    async fn sandbox_accepts_anything() {
        let v = GooglePlayVerifier::new("com.example.duolingocards", true);
        let resp = v.verify(&request("")).await.unwrap();
        assert!(resp.valid);
        assert_eq!(resp.product_id.as_deref(), Some("deck.spanish-verbs"));
    }

    #[tokio::test]
    async fn production_rejects_empty_token() {
        let v = GooglePlayVerifier::new("com.example.duolingocards", false);
        let resp = v.verify(&request("")).await.unwrap();
        assert!(!resp.valid);
        assert_eq!(resp.error.as_deref(), Some("empty receipt data"));
    }

    #[tokio::test]
    async fn production_accepts_any_token() {
        let v = GooglePlayVerifier::new("com.example.duolingocards", false);
        let resp = v.verify(&request("opaque-token")).await.unwrap();
        assert!(resp.valid);
        assert_eq!(resp.deck_id.as_deref(), Some("spanish-verbs"));
    }
}
