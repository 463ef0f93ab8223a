//! Shared domain types for the flashdeck backend and quiz generator.
//!
//! Holds the deck/card data model, the domain error type, and the
//! deterministic naming rules used for generated media files.

pub mod error;
pub mod models;
pub mod prompt;
pub mod slug;
