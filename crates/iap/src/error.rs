/// Errors raised while validating a purchase.
///
/// A receipt that the store rejects is not an error: it is reported as
/// [`VerifyResponse::invalid`](crate::VerifyResponse::invalid). These variants
/// cover a missing receipt and failures talking to the store.
#[derive(Debug, thiserror::Error)]
pub enum IapError {
    /// A paid deck was requested without any receipt data.
    #[error("receipt required for paid deck")]
    ReceiptRequired,

    #[error("store request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store answered with a non-2xx HTTP status.
    #[error("store returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to decode store response: {0}")]
    Decode(String),
}
