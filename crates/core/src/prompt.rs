//! Image prompt templating for card illustrations.

use crate::models::Card;

/// Template used when a deck does not define `imagePromptTemplate`.
pub const DEFAULT_IMAGE_PROMPT_TEMPLATE: &str = "Simple, clean illustration for vocabulary flashcard showing '{word}'. Minimalist, colorful icon-style. No text, no letters. White background.";

/// Substitute card values into an image prompt template.
///
/// | Placeholder | Value                          |
/// |-------------|--------------------------------|
/// | `{word}`    | back text (the translation)    |
/// | `{front}`   | front text                     |
/// | `{back}`    | back text                      |
/// | `{reading}` | phonetic reading, or empty     |
pub fn build_image_prompt(template: &str, card: &Card) -> String {
    template
        .replace("{word}", &card.back_text)
        .replace("{front}", &card.front_text)
        .replace("{back}", &card.back_text)
        .replace("{reading}", card.reading.as_deref().unwrap_or_default())
}

/// The deck template when set and non-empty, otherwise the default.
pub fn template_or_default(template: Option<&str>) -> &str {
    match template {
        Some(t) if !t.trim().is_empty() => t,
        _ => DEFAULT_IMAGE_PROMPT_TEMPLATE,
    }
}
