//! Deck, card, and generation-status models.
//!
//! These are the JSON shapes persisted under `decks/{id}.json`, returned by
//! the HTTP API, and emitted by the quiz generator. Field names are camelCase
//! on the wire; optional fields are omitted when absent.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of cards included in a deck preview.
pub const PREVIEW_CARD_COUNT: usize = 5;

/// Price tier reported for decks that do not declare one.
pub const DEFAULT_PRICE_TIER: &str = "tier1";

/// Price marker for decks that can be downloaded without a receipt.
pub const PRICE_FREE: &str = "free";

/// Maximum length of a deck identifier.
pub const MAX_DECK_ID_LEN: usize = 100;

/// Validate a deck id: it doubles as a filename stem and a media directory
/// name, so only lowercase ASCII letters, digits, `-` and `_` are allowed.
pub fn validate_deck_id(id: &str) -> Result<(), CoreError> {
    if id.is_empty() || id.len() > MAX_DECK_ID_LEN {
        return Err(CoreError::Validation(format!(
            "Deck id must be 1-{MAX_DECK_ID_LEN} characters (got {})",
            id.len()
        )));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(CoreError::Validation(format!(
            "Deck id '{id}' may only contain a-z, 0-9, '-' and '_'"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

/// Per-card media state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaStatus {
    Pending,
    Generating,
    Ready,
    Error,
}

/// State of a deck's most recent generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationState {
    Pending,
    Generating,
    Completed,
    Error,
}

// ---------------------------------------------------------------------------
// Deck / card
// ---------------------------------------------------------------------------

/// Generated media URLs for a card. A `None` field has not been generated yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_front: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_back: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
}

impl Media {
    pub fn is_empty(&self) -> bool {
        self.image.is_none()
            && self.audio_front.is_none()
            && self.audio_back.is_none()
            && self.video.is_none()
    }

    /// Append `suffix` to every URL that is present.
    fn with_suffix(&self, suffix: &str) -> Self {
        let stamp = |url: &Option<String>| url.as_ref().map(|u| format!("{u}{suffix}"));
        Self {
            image: stamp(&self.image),
            audio_front: stamp(&self.audio_front),
            audio_back: stamp(&self.audio_back),
            video: stamp(&self.video),
        }
    }
}

/// A labelled value shown on the back of a quiz card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizField {
    pub label: String,
    pub value: String,
}

/// Quiz-specific payload attached to cards built from Wikidata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizData {
    pub category: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<QuizField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wikidata_id: Option<String>,
}

/// One flashcard. Owned by its parent [`Deck`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub front_text: String,
    pub back_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_status: Option<MediaStatus>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_data: Option<QuizData>,
}

impl Card {
    /// Minimal text-only card.
    pub fn new(id: impl Into<String>, front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            front_text: front.into(),
            back_text: back.into(),
            reading: None,
            priority: 0,
            media: None,
            media_status: None,
            card_type: None,
            quiz_data: None,
        }
    }

    /// The label audio files are named after: the phonetic reading when
    /// present, otherwise the front text.
    pub fn audio_label(&self) -> &str {
        match self.reading.as_deref() {
            Some(reading) if !reading.is_empty() => reading,
            _ => &self.front_text,
        }
    }

    /// Mutable access to the media block, creating it on first use.
    pub fn media_mut(&mut self) -> &mut Media {
        self.media.get_or_insert_with(Media::default)
    }
}

/// A named collection of flashcards sharing a language pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
    pub front_language: String,
    pub back_language: String,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tts_voice_id: Option<String>,
    /// Unix timestamp of the last completed generation run. Only used to
    /// cache-bust media URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// Explicit price tier, or `"free"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl Deck {
    /// Copy of the deck whose media URLs carry a `?v={version}` query
    /// parameter. Decks without a version are returned unchanged.
    pub fn with_versioned_media(&self) -> Deck {
        let version = match self.version {
            Some(v) if v != 0 => v,
            _ => return self.clone(),
        };

        let suffix = format!("?v={version}");
        let mut copy = self.clone();
        for card in &mut copy.cards {
            if let Some(media) = &card.media {
                card.media = Some(media.with_suffix(&suffix));
            }
        }
        copy
    }

    /// Header fields plus the first [`PREVIEW_CARD_COUNT`] cards.
    pub fn preview(&self) -> DeckPreview {
        let count = self.cards.len().min(PREVIEW_CARD_COUNT);
        DeckPreview {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
            front_language: self.front_language.clone(),
            back_language: self.back_language.clone(),
            total_cards: self.cards.len(),
            preview_cards: self.cards[..count].to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// Read-side projections
// ---------------------------------------------------------------------------

/// Catalog entry derived from a [`Deck`]. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub card_count: usize,
    /// `"free"` or a paid tier such as `"tier1"`.
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iap_product_id: Option<String>,
    pub languages: Vec<String>,
}

impl CatalogItem {
    pub fn is_free(&self) -> bool {
        self.price == PRICE_FREE
    }
}

/// Response body of `GET /api/catalog`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub decks: Vec<CatalogItem>,
}

/// Response body of `GET /api/decks/{id}/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckPreview {
    pub id: String,
    pub name: String,
    pub description: String,
    pub front_language: String,
    pub back_language: String,
    pub total_cards: usize,
    pub preview_cards: Vec<Card>,
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// A card selector in a generation request.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInput {
    pub id: String,
    #[serde(default)]
    pub front_text: Option<String>,
    #[serde(default)]
    pub back_text: Option<String>,
    #[serde(default)]
    pub reading: Option<String>,
}

/// Optional body of `POST /api/decks/{id}/generate`. An empty card list
/// means every card in the deck.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub cards: Vec<CardInput>,
}

/// Progress record of a deck's most recent generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateStatus {
    pub deck_id: String,
    pub status: GenerationState,
    pub progress: usize,
    pub total_cards: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateStatus {
    /// Fresh status for a run that is about to start.
    pub fn started(deck_id: impl Into<String>, total_cards: usize) -> Self {
        Self {
            deck_id: deck_id.into(),
            status: GenerationState::Generating,
            progress: 0,
            total_cards,
            error: None,
        }
    }
}
