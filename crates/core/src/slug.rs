//! Media file naming convention.
//!
//! Generates deterministic, URL-safe filenames for generated card assets
//! from the card's position in the deck and a human-readable label.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Maximum slug length (bytes) used in media filenames.
pub const MAX_SLUG_LEN: usize = 30;

/// Runs of anything that is not a lowercase ASCII letter or digit.
static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Slugify `input` and cap it at [`MAX_SLUG_LEN`].
///
/// ```
/// use flashdeck_core::slug::slugify;
///
/// assert_eq!(slugify("Dobrý den"), "dobry-den");
/// assert_eq!(slugify("konnichiwa"), "konnichiwa");
/// ```
pub fn slugify(input: &str) -> String {
    slugify_with_limit(input, MAX_SLUG_LEN)
}

/// Slugify `input` with an explicit length cap.
///
/// Lowercases, strips diacritics (NFD decomposition with combining marks
/// removed), collapses every non-alphanumeric run into a single `-`, and
/// trims hyphens from both ends. Output never exceeds `max_len` bytes and
/// never ends with a hyphen.
pub fn slugify_with_limit(input: &str, max_len: usize) -> String {
    let folded: String = input
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    let mut slug = NON_ALNUM_RE
        .replace_all(&folded, "-")
        .trim_matches('-')
        .to_string();

    // Only ASCII survives the regex, so byte truncation is char-safe.
    if slug.len() > max_len {
        slug.truncate(max_len);
        let trimmed = slug.trim_end_matches('-').len();
        slug.truncate(trimmed);
    }

    slug
}

/// Build a media filename for the card at 1-based `index`.
///
/// Convention: `{index:02}-{slug}-{kind}.{extension}`
///
/// ```
/// use flashdeck_core::slug::media_filename;
///
/// assert_eq!(media_filename(1, "Dobrý den", "image", "png"), "01-dobry-den-image.png");
/// assert_eq!(media_filename(12, "konnichiwa", "audio", "mp3"), "12-konnichiwa-audio.mp3");
/// ```
pub fn media_filename(index: usize, label: &str, kind: &str, extension: &str) -> String {
    format!("{index:02}-{}-{kind}.{extension}", slugify(label))
}
