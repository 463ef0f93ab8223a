//! App Store receipt verification via the legacy `verifyReceipt` endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::IapError;
use crate::models::{VerifyRequest, VerifyResponse};
use crate::validator::ReceiptVerifier;

pub const APPLE_PRODUCTION_URL: &str = "https://buy.itunes.apple.com/verifyReceipt";
pub const APPLE_SANDBOX_URL: &str = "https://sandbox.itunes.apple.com/verifyReceipt";

/// Status Apple returns when a sandbox receipt is sent to production.
pub const STATUS_SANDBOX_RECEIPT: i64 = 21007;

#[derive(Debug, Serialize)]
struct AppleReceiptRequest<'a> {
    #[serde(rename = "receipt-data")]
    receipt_data: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(rename = "exclude-old-transactions")]
    exclude_old_transactions: bool,
}

#[derive(Debug, Deserialize)]
struct AppleReceiptResponse {
    status: i64,
    #[serde(default)]
    receipt: Option<AppleReceipt>,
}

#[derive(Debug, Default, Deserialize)]
struct AppleReceipt {
    #[serde(default)]
    in_app: Vec<InAppPurchase>,
}

#[derive(Debug, Deserialize)]
struct InAppPurchase {
    #[serde(default)]
    product_id: String,
}

/// Verifies iOS receipts against Apple's production or sandbox endpoint.
pub struct AppleVerifier {
    client: reqwest::Client,
    shared_secret: Option<String>,
    sandbox: bool,
    production_url: String,
    sandbox_url: String,
}

impl AppleVerifier {
    /// An empty `shared_secret` omits the `password` field.
    pub fn new(shared_secret: impl Into<String>, sandbox: bool) -> Self {
        let shared_secret: String = shared_secret.into();
        Self {
            client: reqwest::Client::new(),
            shared_secret: (!shared_secret.is_empty()).then_some(shared_secret),
            sandbox,
            production_url: APPLE_PRODUCTION_URL.to_string(),
            sandbox_url: APPLE_SANDBOX_URL.to_string(),
        }
    }

    /// Override both endpoints.
    pub fn with_endpoints(mut self, production_url: String, sandbox_url: String) -> Self {
        self.production_url = production_url;
        self.sandbox_url = sandbox_url;
        self
    }

    async fn send(
        &self,
        url: &str,
        body: &AppleReceiptRequest<'_>,
    ) -> Result<AppleReceiptResponse, IapError> {
        let response = self.client.post(url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(IapError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<AppleReceiptResponse>()
            .await
            .map_err(|e| IapError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ReceiptVerifier for AppleVerifier {
    async fn verify(&self, request: &VerifyRequest) -> Result<VerifyResponse, IapError> {
        let body = AppleReceiptRequest {
            receipt_data: &request.receipt_data,
            password: self.shared_secret.as_deref(),
            exclude_old_transactions: true,
        };

        let url = if self.sandbox {
            &self.sandbox_url
        } else {
            &self.production_url
        };

        let mut response = self.send(url, &body).await?;

        if response.status == STATUS_SANDBOX_RECEIPT && !self.sandbox {
            tracing::debug!(deck_id = %request.deck_id, "Sandbox receipt sent to production, retrying sandbox");
            response = self.send(&self.sandbox_url, &body).await?;
        }

        if response.status != 0 {
            return Ok(VerifyResponse::invalid(format!(
                "apple verification failed: status {}",
                response.status
            )));
        }

        let purchases = response.receipt.unwrap_or_default().in_app;
        if purchases.is_empty() {
            return Ok(VerifyResponse::invalid("no in-app purchases in receipt"));
        }

        match purchases
            .into_iter()
            .find(|p| p.product_id == request.product_id)
        {
            Some(purchase) => Ok(VerifyResponse::valid(
                request.deck_id.clone(),
                Some(purchase.product_id),
            )),
            None => Ok(VerifyResponse::invalid("product not found in receipt")),
        }
    }
}
