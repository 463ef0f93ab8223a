use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::apple::AppleVerifier;
use crate::error::IapError;
use crate::google::GooglePlayVerifier;
use crate::models::{VerifyRequest, VerifyResponse};

/// A store-specific receipt check.
///
/// A rejected receipt is `Ok` with `valid == false`; `Err` is reserved for
/// failures to reach or understand the store.
#[async_trait]
pub trait ReceiptVerifier: Send + Sync {
    async fn verify(&self, request: &VerifyRequest) -> Result<VerifyResponse, IapError>;
}

/// Whether `deck_id` requires a purchase.
pub fn is_paid_deck(deck_id: &str, free_decks: &HashSet<String>) -> bool {
    !free_decks.contains(deck_id)
}

/// Dispatches receipts to the verifier for their platform.
#[derive(Clone)]
pub struct ReceiptValidator {
    apple: Arc<dyn ReceiptVerifier>,
    google: Arc<dyn ReceiptVerifier>,
}

impl ReceiptValidator {
    /// Validator backed by the real App Store and Google Play verifiers.
    pub fn new(apple_shared_secret: &str, google_package_name: &str, sandbox: bool) -> Self {
        Self::with_verifiers(
            Arc::new(AppleVerifier::new(apple_shared_secret, sandbox)),
            Arc::new(GooglePlayVerifier::new(google_package_name, sandbox)),
        )
    }

    pub fn with_verifiers(
        apple: Arc<dyn ReceiptVerifier>,
        google: Arc<dyn ReceiptVerifier>,
    ) -> Self {
        Self { apple, google }
    }

    /// Verify a receipt on its platform. Unknown platforms are invalid, not
    /// errors.
    pub async fn verify(&self, request: &VerifyRequest) -> Result<VerifyResponse, IapError> {
        match request.platform.to_lowercase().as_str() {
            "ios" => self.apple.verify(request).await,
            "android" => self.google.verify(request).await,
            other => {
                tracing::debug!(platform = %other, "Unknown receipt platform");
                Ok(VerifyResponse::invalid("unknown platform"))
            }
        }
    }

    /// Check that `request` grants access to `request.deck_id`.
    ///
    /// Free decks are valid without any network call. Paid decks need a
    /// non-empty receipt, which is then verified.
    pub async fn validate_purchase_for_deck(
        &self,
        request: &VerifyRequest,
        free_decks: &HashSet<String>,
    ) -> Result<VerifyResponse, IapError> {
        if !is_paid_deck(&request.deck_id, free_decks) {
            return Ok(VerifyResponse::valid(request.deck_id.clone(), None));
        }

        if request.receipt_data.is_empty() {
            return Err(IapError::ReceiptRequired);
        }

        self.verify(request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;

    use super::*;

    /// Accepts everything and counts calls.
    #[derive(Default)]
    struct CountingVerifier {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReceiptVerifier for CountingVerifier {
        async fn verify(&self, request: &VerifyRequest) -> Result<VerifyResponse, IapError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(VerifyResponse::valid(
                request.deck_id.clone(),
                Some(request.product_id.clone()),
            ))
        }
    }

    fn free_decks() -> HashSet<String> {
        HashSet::from(["japanese-basics".to_string()])
    }

    fn setup() -> (ReceiptValidator, Arc<CountingVerifier>, Arc<CountingVerifier>) {
        let apple = Arc::new(CountingVerifier::default());
        let google = Arc::new(CountingVerifier::default());
        let validator = ReceiptValidator::with_verifiers(apple.clone(), google.clone());
        (validator, apple, google)
    }

    fn request(platform: &str, receipt: &str, deck_id: &str) -> VerifyRequest {
        VerifyRequest {
            platform: platform.into(),
            receipt_data: receipt.into(),
            product_id: format!("deck.{deck_id}"),
            deck_id: deck_id.into(),
        }
    }

    #[test]
    fn paid_deck_is_anything_not_free() {
        assert!(!is_paid_deck("japanese-basics", &free_decks()));
        assert!(is_paid_deck("spanish-verbs", &free_decks()));
        assert!(is_paid_deck("spanish-verbs", &HashSet::new()));
    }

    #[tokio::test]
    async fn free_deck_needs_no_receipt() {
        let (validator, apple, google) = setup();

        let resp = validator
            .validate_purchase_for_deck(&request("", "", "japanese-basics"), &free_decks())
            .await
            .unwrap();

        assert!(resp.valid);
        assert_eq!(resp.deck_id.as_deref(), Some("japanese-basics"));
        assert_eq!(apple.calls.load(Ordering::SeqCst), 0);
        assert_eq!(google.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn paid_deck_without_receipt_is_rejected_before_network() {
        let (validator, apple, _) = setup();

        let err = validator
            .validate_purchase_for_deck(&request("ios", "", "spanish-verbs"), &free_decks())
            .await
            .unwrap_err();

        assert_matches!(err, IapError::ReceiptRequired);
        assert_eq!(err.to_string(), "receipt required for paid deck");
        assert_eq!(apple.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn paid_deck_dispatches_by_platform() {
        let (validator, apple, google) = setup();

        validator
            .validate_purchase_for_deck(&request("iOS", "r", "spanish-verbs"), &free_decks())
            .await
            .unwrap();
        validator
            .validate_purchase_for_deck(&request("ANDROID", "r", "spanish-verbs"), &free_decks())
            .await
            .unwrap();

        assert_eq!(apple.calls.load(Ordering::SeqCst), 1);
        assert_eq!(google.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_platform_is_invalid_not_error() {
        let (validator, apple, google) = setup();

        let resp = validator
            .verify(&request("windows", "r", "spanish-verbs"))
            .await
            .unwrap();

        assert!(!resp.valid);
        assert_eq!(resp.error.as_deref(), Some("unknown platform"));
        assert_eq!(apple.calls.load(Ordering::SeqCst) + google.calls.load(Ordering::SeqCst), 0);
    }
}
