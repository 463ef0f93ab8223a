//! Catalog pricing and IAP product ids.

use std::collections::HashSet;

use flashdeck_core::models::{CatalogItem, Deck, DEFAULT_PRICE_TIER, PRICE_FREE};

/// Decides what a deck costs and which store product unlocks it.
#[derive(Debug, Clone, Default)]
pub struct Pricing {
    /// Deck ids downloadable without a receipt.
    pub free_decks: HashSet<String>,
    /// Prefix of store product ids; the deck id is appended.
    pub product_prefix: String,
}

impl Pricing {
    pub fn new(free_decks: HashSet<String>, product_prefix: impl Into<String>) -> Self {
        Self {
            free_decks,
            product_prefix: product_prefix.into(),
        }
    }

    /// The deck's explicit price when set, otherwise `free` for configured
    /// free decks and the default paid tier for everything else.
    pub fn price_of(&self, deck: &Deck) -> String {
        match deck.price.as_deref() {
            Some(price) if !price.is_empty() => price.to_string(),
            _ if self.free_decks.contains(&deck.id) => PRICE_FREE.to_string(),
            _ => DEFAULT_PRICE_TIER.to_string(),
        }
    }

    pub fn is_free(&self, deck: &Deck) -> bool {
        self.price_of(deck) == PRICE_FREE
    }

    pub fn product_id(&self, deck_id: &str) -> String {
        format!("{}{}", self.product_prefix, deck_id)
    }

    pub fn catalog_item(&self, deck: &Deck) -> CatalogItem {
        let price = self.price_of(deck);
        let iap_product_id = (price != PRICE_FREE).then(|| self.product_id(&deck.id));

        CatalogItem {
            id: deck.id.clone(),
            name: deck.name.clone(),
            description: deck.description.clone().unwrap_or_default(),
            card_count: deck.cards.len(),
            price,
            iap_product_id,
            languages: vec![deck.front_language.clone(), deck.back_language.clone()],
        }
    }
}
