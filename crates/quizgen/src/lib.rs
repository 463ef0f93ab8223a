//! Offline generator for quiz decks built from Wikidata.
//!
//! Each [`generator::QuizGenerator`] runs a SPARQL query, downloads the
//! pictures it references into the output media directory, and the
//! [`deck::DeckBuilder`] turns the items into a `cardType: "quiz"` deck the
//! API server can load.

pub mod breeds;
pub mod capitals;
pub mod deck;
pub mod downloader;
pub mod error;
pub mod generator;
pub mod sparql;
