//! The quiz generator capability and the run pipeline shared by every quiz
//! type.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use flashdeck_core::models::QuizField;

use crate::breeds::{BreedGenerator, CATS, DOGS};
use crate::capitals::CapitalsGenerator;
use crate::deck::{DeckBuilder, DeckInfo};
use crate::downloader::Downloader;
use crate::error::QuizError;
use crate::sparql::SparqlClient;

/// Width, in pixels, pictures are rasterized to.
pub const IMAGE_WIDTH: u32 = 512;

/// Quiz types the CLI knows, in `--type` spelling.
pub const QUIZ_TYPES: &[&str] = &["capitals", "dogbreeds", "catbreeds"];

/// One quiz entry before it becomes a card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizItem {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    /// Remote picture to download.
    pub image_url: String,
    /// Picture path relative to the deck media root, once downloaded.
    pub local_image: Option<String>,
    pub fields: Vec<QuizField>,
    pub wikidata_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct QuizOptions {
    pub limit: usize,
    /// Preferred label language; English is always the fallback.
    pub language: String,
}

impl Default for QuizOptions {
    fn default() -> Self {
        Self {
            limit: 50,
            language: "cs".into(),
        }
    }
}

/// A source of quiz items.
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    /// `--type` name, also used as the quiz category on every card.
    fn name(&self) -> &'static str;

    /// Deck metadata for a run with `opts`.
    fn deck_info(&self, opts: &QuizOptions) -> DeckInfo;

    async fn fetch_data(&self, opts: &QuizOptions) -> Result<Vec<QuizItem>, QuizError>;

    /// Download pictures into `dir` and record the local paths. Items whose
    /// picture fails keep `local_image: None`.
    async fn download_media(&self, items: Vec<QuizItem>, dir: &Path) -> Vec<QuizItem>;
}

/// Resolve a `--type` value to its generator.
pub fn generator_for(
    kind: &str,
    sparql: SparqlClient,
    downloader: Downloader,
) -> Result<Box<dyn QuizGenerator>, QuizError> {
    match kind {
        "capitals" => Ok(Box::new(CapitalsGenerator::new(sparql, downloader))),
        "dogbreeds" => Ok(Box::new(BreedGenerator::new(&DOGS, sparql, downloader))),
        "catbreeds" => Ok(Box::new(BreedGenerator::new(&CATS, sparql, downloader))),
        other => Err(QuizError::UnknownType(other.to_string())),
    }
}

/// Download every item's picture with a pause between requests.
///
/// Pictures land in `dir`; the recorded local path is `{prefix}/{file}`.
pub(crate) async fn download_pictures(
    downloader: &Downloader,
    mut items: Vec<QuizItem>,
    dir: &Path,
    prefix: &str,
    pause: Duration,
) -> Vec<QuizItem> {
    let total = items.len();
    for (i, item) in items.iter_mut().enumerate() {
        if item.image_url.is_empty() {
            continue;
        }

        tracing::info!(item = %item.id, "Downloading picture {}/{}", i + 1, total);
        match downloader
            .download_and_convert(&item.image_url, dir, &item.id, IMAGE_WIDTH)
            .await
        {
            Ok(file) => item.local_image = Some(format!("{prefix}/{file}")),
            Err(e) => tracing::warn!(item = %item.id, url = %item.image_url, error = %e, "Picture download failed"),
        }

        tokio::time::sleep(pause).await;
    }
    items
}

/// Where and what a run wrote.
#[derive(Debug)]
pub struct RunSummary {
    pub deck_id: String,
    pub deck_path: PathBuf,
    pub media_dir: PathBuf,
    pub cards: usize,
    pub with_picture: usize,
}

/// Fetch, download, and write one quiz deck under `output`.
///
/// Layout:
///
/// ```text
/// {output}/decks/{deck_id}.json
/// {output}/media/{media_subdir}/{item_id}.png
/// ```
pub async fn run(
    generator: &dyn QuizGenerator,
    opts: &QuizOptions,
    output: &Path,
) -> Result<RunSummary, QuizError> {
    let info = generator.deck_info(opts);
    let media_dir = output.join("media").join(&info.media_subdir);
    tokio::fs::create_dir_all(&media_dir)
        .await
        .map_err(|e| QuizError::io(&media_dir, e))?;

    tracing::info!(generator = generator.name(), limit = opts.limit, lang = %opts.language, "Fetching quiz data");
    let items = generator.fetch_data(opts).await?;
    tracing::info!(count = items.len(), "Fetched quiz items");

    let items = generator.download_media(items, &media_dir).await;
    let with_picture = items.iter().filter(|i| i.local_image.is_some()).count();

    let deck = DeckBuilder::new(info, &opts.language).build(generator.name(), &items);
    let deck_path = output.join("decks").join(format!("{}.json", deck.id));
    DeckBuilder::save_json(&deck, &deck_path).await?;

    Ok(RunSummary {
        deck_id: deck.id,
        deck_path,
        media_dir,
        cards: items.len(),
        with_picture,
    })
}
