//! In-app purchase receipt validation for paid decks.
//!
//! [`ReceiptValidator`] gates deck downloads: free decks pass without any
//! network call, paid decks need a receipt that a platform
//! [`ReceiptVerifier`] accepts.

pub mod apple;
pub mod error;
pub mod google;
pub mod models;
pub mod validator;

pub use apple::AppleVerifier;
pub use error::IapError;
pub use google::GooglePlayVerifier;
pub use models::{VerifyRequest, VerifyResponse};
pub use validator::{is_paid_deck, ReceiptValidator, ReceiptVerifier};
