//! Deck registry and background media generation.

pub mod generator;
pub mod outcome;
pub mod pricing;

pub use generator::DeckGenerator;
pub use outcome::{AssetOutcome, CardOutcome, RunReport};
pub use pricing::Pricing;
