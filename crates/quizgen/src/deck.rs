use std::path::Path;

use flashdeck_core::models::{Card, Deck, Media, QuizData};

use crate::error::QuizError;
use crate::generator::QuizItem;

/// Card and deck type marker for quiz content.
pub const QUIZ_CARD_TYPE: &str = "quiz";

/// Quiz cards show a picture on the front rather than text.
pub const VISUAL_FRONT_LANGUAGE: &str = "visual";

/// Deck identity chosen by a generator.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Directory under `{output}/media` the pictures are written to.
    pub media_subdir: String,
}

/// Turns quiz items into a deck.
pub struct DeckBuilder {
    info: DeckInfo,
    language: String,
}

impl DeckBuilder {
    pub fn new(info: DeckInfo, language: impl Into<String>) -> Self {
        Self {
            info,
            language: language.into(),
        }
    }

    /// Build the deck. Each item becomes one card whose back is the title;
    /// `category` is stamped on every card's quiz data.
    pub fn build(&self, category: &str, items: &[QuizItem]) -> Deck {
        let cards = items
            .iter()
            .map(|item| {
                let mut card = Card::new(&item.id, "", &item.title);
                card.card_type = Some(QUIZ_CARD_TYPE.into());
                card.media = item.local_image.as_ref().map(|image| Media {
                    image: Some(image.clone()),
                    ..Default::default()
                });
                card.quiz_data = Some(QuizData {
                    category: category.to_string(),
                    title: item.title.clone(),
                    subtitle: item.subtitle.clone(),
                    fields: item.fields.clone(),
                    wikidata_id: item.wikidata_id.clone(),
                });
                card
            })
            .collect();

        Deck {
            id: self.info.id.clone(),
            name: self.info.name.clone(),
            description: Some(self.info.description.clone()),
            card_type: Some(QUIZ_CARD_TYPE.into()),
            front_language: VISUAL_FRONT_LANGUAGE.into(),
            back_language: self.language.clone(),
            cards,
            media_base_url: Some(format!("assets/media/{}", self.info.id)),
            image_prompt_template: None,
            tts_voice_id: None,
            version: None,
            price: None,
        }
    }

    /// Write `deck` as pretty-printed JSON, creating parent directories.
    pub async fn save_json(deck: &Deck, path: &Path) -> Result<(), QuizError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| QuizError::io(parent, e))?;
        }

        let json = serde_json::to_vec_pretty(deck).map_err(|e| QuizError::Decode {
            what: "deck",
            message: e.to_string(),
        })?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| QuizError::io(path, e))
    }
}
