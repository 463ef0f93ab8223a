//! In-memory deck registry and the per-card media fill-in run.
//!
//! [`DeckGenerator`] owns every loaded deck and the most recent
//! [`GenerateStatus`] per deck behind one `RwLock`. A generation request
//! installs a fresh status and spawns a background run that walks the
//! deck's cards, creating any missing audio/image files through the
//! configured media clients.
//!
//! Runs for the same deck are serialized by a per-deck run lock. Each run
//! carries a run id; once a newer run has replaced the status record, the
//! older run keeps filling in media but no longer touches the status.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use flashdeck_core::error::CoreError;
use flashdeck_core::models::{
    Card, Catalog, Deck, DeckPreview, GenerateRequest, GenerateStatus, GenerationState,
    MediaStatus,
};
use flashdeck_core::prompt::{build_image_prompt, template_or_default};
use flashdeck_core::slug::media_filename;
use flashdeck_media::image::ImageGenerator;
use flashdeck_media::storage::LocalStorage;
use flashdeck_media::tts::SpeechSynthesizer;
use flashdeck_media::{MediaError, StorageError};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use super::outcome::{AssetOutcome, CardOutcome, RunReport};
use super::pricing::Pricing;

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Status record tagged with the run that owns it.
#[derive(Debug, Clone)]
struct StatusEntry {
    run_id: u64,
    status: GenerateStatus,
}

#[derive(Debug, Default)]
struct Registry {
    decks: HashMap<String, Deck>,
    statuses: HashMap<String, StatusEntry>,
}

/// Authoritative registry of decks and their generation status.
pub struct DeckGenerator {
    storage: Arc<LocalStorage>,
    speech: Option<Arc<dyn SpeechSynthesizer>>,
    images: Option<Arc<dyn ImageGenerator>>,
    pricing: Pricing,
    registry: RwLock<Registry>,
    run_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    next_run_id: AtomicU64,
}

impl DeckGenerator {
    /// Empty registry with no media clients. Assets are skipped until
    /// clients are attached with [`with_speech`](Self::with_speech) and
    /// [`with_images`](Self::with_images).
    pub fn new(storage: Arc<LocalStorage>, pricing: Pricing) -> Self {
        Self {
            storage,
            speech: None,
            images: None,
            pricing,
            registry: RwLock::new(Registry::default()),
            run_locks: Mutex::new(HashMap::new()),
            next_run_id: AtomicU64::new(1),
        }
    }

    pub fn with_speech(mut self, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn with_images(mut self, images: Arc<dyn ImageGenerator>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn pricing(&self) -> &Pricing {
        &self.pricing
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    /// Load every deck file from storage into the registry. Returns the
    /// number of decks loaded.
    pub async fn load_from_storage(&self) -> Result<usize, StorageError> {
        let decks = self.storage.load_decks().await?;
        let count = decks.len();

        let mut registry = self.registry.write().await;
        for deck in decks {
            tracing::debug!(deck_id = %deck.id, cards = deck.cards.len(), "Loaded deck");
            registry.decks.insert(deck.id.clone(), deck);
        }

        Ok(count)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// One catalog item per deck, sorted by id.
    pub async fn get_catalog(&self) -> Catalog {
        let registry = self.registry.read().await;
        let mut decks: Vec<_> = registry
            .decks
            .values()
            .map(|deck| self.pricing.catalog_item(deck))
            .collect();
        decks.sort_by(|a, b| a.id.cmp(&b.id));
        Catalog { decks }
    }

    pub async fn get_deck_preview(&self, deck_id: &str) -> Result<DeckPreview, CoreError> {
        let registry = self.registry.read().await;
        let deck = registry
            .decks
            .get(deck_id)
            .ok_or_else(|| CoreError::deck_not_found(deck_id))?;
        Ok(deck.with_versioned_media().preview())
    }

    /// Full deck with cache-busted media URLs. The stored deck is not
    /// modified.
    pub async fn get_deck(&self, deck_id: &str) -> Result<Deck, CoreError> {
        let registry = self.registry.read().await;
        registry
            .decks
            .get(deck_id)
            .map(Deck::with_versioned_media)
            .ok_or_else(|| CoreError::deck_not_found(deck_id))
    }

    pub async fn get_status(&self, deck_id: &str) -> Result<GenerateStatus, CoreError> {
        let registry = self.registry.read().await;
        registry
            .statuses
            .get(deck_id)
            .map(|entry| entry.status.clone())
            .ok_or_else(|| CoreError::NotFound {
                entity: "Generation status",
                id: deck_id.to_string(),
            })
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert or replace a deck and persist it.
    pub async fn create_deck(&self, deck: Deck) -> Result<Deck, CoreError> {
        self.storage
            .save_deck(&deck)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?;

        let mut registry = self.registry.write().await;
        registry.decks.insert(deck.id.clone(), deck.clone());
        tracing::info!(deck_id = %deck.id, cards = deck.cards.len(), "Deck saved");

        Ok(deck)
    }

    /// Start a background generation run and return the fresh status.
    pub async fn start_generation(
        self: &Arc<Self>,
        deck_id: &str,
        request: GenerateRequest,
    ) -> Result<GenerateStatus, CoreError> {
        let (status, _handle) = self.spawn_generation(deck_id, request).await?;
        Ok(status)
    }

    /// Like [`start_generation`](Self::start_generation), but also returns
    /// the run's join handle.
    ///
    /// A non-empty `request.cards` restricts the run to those card ids;
    /// unknown ids are ignored and `totalCards` counts only matched cards.
    pub async fn spawn_generation(
        self: &Arc<Self>,
        deck_id: &str,
        request: GenerateRequest,
    ) -> Result<(GenerateStatus, JoinHandle<RunReport>), CoreError> {
        let selection: Option<HashSet<String>> = if request.cards.is_empty() {
            None
        } else {
            Some(request.cards.into_iter().map(|c| c.id).collect())
        };

        let run_id = self.next_run_id.fetch_add(1, Ordering::Relaxed);

        let status = {
            let mut registry = self.registry.write().await;
            let deck = registry
                .decks
                .get(deck_id)
                .ok_or_else(|| CoreError::deck_not_found(deck_id))?;

            let total = deck
                .cards
                .iter()
                .filter(|card| is_selected(&selection, card))
                .count();

            let status = GenerateStatus::started(deck_id, total);
            registry.statuses.insert(
                deck_id.to_string(),
                StatusEntry {
                    run_id,
                    status: status.clone(),
                },
            );
            status
        };

        tracing::info!(deck_id, run_id, total_cards = status.total_cards, "Generation started");

        let generator = Arc::clone(self);
        let deck_id = deck_id.to_string();
        let handle = tokio::spawn(async move { generator.run(deck_id, run_id, selection).await });

        Ok((status, handle))
    }

    // -----------------------------------------------------------------------
    // Fill-in run
    // -----------------------------------------------------------------------

    async fn run_lock(&self, deck_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.run_locks.lock().await;
        Arc::clone(locks.entry(deck_id.to_string()).or_default())
    }

    async fn run(
        self: Arc<Self>,
        deck_id: String,
        run_id: u64,
        selection: Option<HashSet<String>>,
    ) -> RunReport {
        let lock = self.run_lock(&deck_id).await;
        let _guard = lock.lock().await;

        let mut report = RunReport {
            deck_id: deck_id.clone(),
            run_id,
            cards: Vec::new(),
            superseded: false,
            persisted: false,
            version: None,
        };

        // Work from a snapshot so vendor calls happen without holding the lock.
        let Some(deck) = self.registry.read().await.decks.get(&deck_id).cloned() else {
            tracing::warn!(deck_id = %deck_id, run_id, "Deck disappeared before generation");
            return report;
        };

        tracing::debug!(
            deck_id = %deck_id,
            run_id,
            speech = self.speech.is_some(),
            images = self.images.is_some(),
            "Running media fill-in",
        );

        for (position, card) in deck.cards.iter().enumerate() {
            if !is_selected(&selection, card) {
                continue;
            }

            let outcome = self.fill_card(&deck, position + 1, card).await;
            self.apply_outcome(&deck_id, run_id, &outcome).await;
            report.cards.push(outcome);
        }

        self.finish(&mut report).await;
        report
    }

    async fn fill_card(&self, deck: &Deck, index: usize, card: &Card) -> CardOutcome {
        let audio = match &self.speech {
            Some(speech) => {
                let filename = media_filename(index, card.audio_label(), "audio", "mp3");
                self.fill_asset(&deck.id, &filename, || {
                    speech.synthesize(&card.front_text, deck.tts_voice_id.as_deref())
                })
                .await
            }
            None => AssetOutcome::Skipped,
        };

        let image = match &self.images {
            Some(images) => {
                let filename = media_filename(index, &card.back_text, "image", "png");
                let template = template_or_default(deck.image_prompt_template.as_deref());
                let prompt = build_image_prompt(template, card);
                self.fill_asset(&deck.id, &filename, || images.generate(&prompt))
                    .await
            }
            None => AssetOutcome::Skipped,
        };

        CardOutcome {
            card_id: card.id.clone(),
            index,
            audio,
            image,
        }
    }

    /// Reuse an existing file under `filename`, or produce and save it.
    async fn fill_asset<F, Fut>(&self, deck_id: &str, filename: &str, produce: F) -> AssetOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>, MediaError>>,
    {
        if self.storage.exists(deck_id, filename).await {
            tracing::debug!(deck_id, filename, "Media exists, skipping vendor call");
            return AssetOutcome::Reused(self.storage.build_url(deck_id, filename));
        }

        let bytes = match produce().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(deck_id, filename, error = %e, "Media generation failed");
                return AssetOutcome::Failed(e.to_string());
            }
        };

        match self.storage.save(deck_id, filename, &bytes).await {
            Ok(url) => {
                tracing::debug!(deck_id, %url, "Media saved");
                AssetOutcome::Generated(url)
            }
            Err(e) => {
                tracing::error!(deck_id, filename, error = %e, "Failed to store media");
                AssetOutcome::Failed(e.to_string())
            }
        }
    }

    /// Record a card's media on the stored deck and advance progress if
    /// this run still owns the status record.
    async fn apply_outcome(&self, deck_id: &str, run_id: u64, outcome: &CardOutcome) {
        let mut registry = self.registry.write().await;

        // Cards are addressed by position; ids are not unique within a deck.
        if let Some(card) = registry
            .decks
            .get_mut(deck_id)
            .and_then(|deck| deck.cards.get_mut(outcome.index - 1))
            .filter(|card| card.id == outcome.card_id)
        {
            if let Some(url) = outcome.audio.url() {
                card.media_mut().audio_front = Some(url.to_string());
            }
            if let Some(url) = outcome.image.url() {
                card.media_mut().image = Some(url.to_string());
            }
            card.media_status = Some(MediaStatus::Ready);
        }

        if let Some(entry) = registry.statuses.get_mut(deck_id) {
            if entry.run_id == run_id {
                entry.status.progress += 1;
            }
        }
    }

    /// Mark the run completed, bump the deck version, and persist.
    async fn finish(&self, report: &mut RunReport) {
        let snapshot = {
            let mut registry = self.registry.write().await;

            match registry.statuses.get_mut(&report.deck_id) {
                Some(entry) if entry.run_id == report.run_id => {
                    entry.status.status = GenerationState::Completed;
                }
                _ => report.superseded = true,
            }

            registry.decks.get_mut(&report.deck_id).map(|deck| {
                deck.version = Some(chrono::Utc::now().timestamp());
                deck.clone()
            })
        };

        if let Some(deck) = snapshot {
            report.version = deck.version;
            match self.storage.save_deck(&deck).await {
                Ok(()) => report.persisted = true,
                Err(e) => {
                    tracing::error!(deck_id = %deck.id, error = %e, "Failed to persist deck");
                }
            }
        }

        tracing::info!(
            deck_id = %report.deck_id,
            run_id = report.run_id,
            version = ?report.version,
            generated = report.generated(),
            reused = report.reused(),
            failed = report.failed(),
            skipped = report.skipped(),
            superseded = report.superseded,
            "Generation finished",
        );
    }
}

fn is_selected(selection: &Option<HashSet<String>>, card: &Card) -> bool {
    selection
        .as_ref()
        .map_or(true, |ids| ids.contains(&card.id))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use flashdeck_core::models::CardInput;
    use tempfile::TempDir;
    use tokio::sync::Semaphore;

    use super::*;

    // -- Fakes ---------------------------------------------------------------

    /// Returns the text as bytes; optionally waits for a permit per call.
    #[derive(Default)]
    struct FakeSpeech {
        calls: AtomicUsize,
        gate: Option<Arc<Semaphore>>,
        fail: bool,
    }

    #[async_trait]
    impl SpeechSynthesizer for FakeSpeech {
        async fn synthesize(
            &self,
            text: &str,
            _voice_id: Option<&str>,
        ) -> Result<Vec<u8>, MediaError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
            if self.fail {
                return Err(MediaError::EmptyResponse);
            }
            Ok(text.as_bytes().to_vec())
        }
    }

    #[derive(Default)]
    struct FakeImages {
        prompts: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ImageGenerator for FakeImages {
        async fn generate(&self, prompt: &str) -> Result<Vec<u8>, MediaError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(b"png".to_vec())
        }
    }

    // -- Helpers -------------------------------------------------------------

    fn deck() -> Deck {
        let mut hello = Card::new("c1", "こんにちは", "Dobrý den");
        hello.reading = Some("konnichiwa".into());
        Deck {
            id: "japanese-basics".into(),
            name: "Japanese Basics".into(),
            description: Some("Greetings".into()),
            card_type: None,
            front_language: "ja".into(),
            back_language: "cs".into(),
            cards: vec![hello, Card::new("c2", "いぬ", "pes"), Card::new("c3", "ねこ", "kočka")],
            media_base_url: None,
            image_prompt_template: Some("icon of {word}".into()),
            tts_voice_id: None,
            version: None,
            price: None,
        }
    }

    async fn generator(dir: &TempDir) -> DeckGenerator {
        let storage = Arc::new(LocalStorage::new(dir.path(), "http://localhost:8080/media"));
        storage.save_deck(&deck()).await.unwrap();
        let generator = DeckGenerator::new(
            storage,
            Pricing::new(HashSet::from(["japanese-basics".into()]), "deck."),
        );
        generator.load_from_storage().await.unwrap();
        generator
    }

    // -- Tests ---------------------------------------------------------------

    #[tokio::test]
    async fn unknown_deck_is_not_found() {
        let dir = TempDir::new().unwrap();
        let generator = Arc::new(generator(&dir).await);

        assert_matches!(
            generator.get_deck("nope").await,
            Err(CoreError::NotFound { entity: "Deck", .. })
        );
        assert_matches!(
            generator.start_generation("nope", GenerateRequest::default()).await,
            Err(CoreError::NotFound { .. })
        );
        assert_matches!(generator.get_status("japanese-basics").await, Err(CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn run_without_clients_marks_cards_ready() {
        let dir = TempDir::new().unwrap();
        let generator = Arc::new(generator(&dir).await);

        let (status, handle) = generator
            .spawn_generation("japanese-basics", GenerateRequest::default())
            .await
            .unwrap();
        assert_eq!(status.status, GenerationState::Generating);
        assert_eq!(status.progress, 0);
        assert_eq!(status.total_cards, 3);

        let report = handle.await.unwrap();
        assert_eq!(report.skipped(), 6);
        assert!(report.persisted);

        let status = generator.get_status("japanese-basics").await.unwrap();
        assert_eq!(status.status, GenerationState::Completed);
        assert_eq!(status.progress, 3);

        let deck = generator.get_deck("japanese-basics").await.unwrap();
        assert!(deck.version.unwrap() > 0);
        for card in &deck.cards {
            assert_eq!(card.media_status, Some(MediaStatus::Ready));
            assert!(card.media.is_none());
        }
    }

    #[tokio::test]
    async fn run_generates_then_reuses_existing_files() {
        let dir = TempDir::new().unwrap();
        let speech = Arc::new(FakeSpeech::default());
        let images = Arc::new(FakeImages::default());
        let generator = Arc::new(
            generator(&dir)
                .await
                .with_speech(speech.clone())
                .with_images(images.clone()),
        );

        let (_, handle) = generator
            .spawn_generation("japanese-basics", GenerateRequest::default())
            .await
            .unwrap();
        let first = handle.await.unwrap();

        assert_eq!(first.generated(), 6);
        assert_eq!(
            first.cards[0].audio,
            AssetOutcome::Generated(
                "http://localhost:8080/media/japanese-basics/01-konnichiwa-audio.mp3".into()
            )
        );
        assert_eq!(
            first.cards[0].image,
            AssetOutcome::Generated(
                "http://localhost:8080/media/japanese-basics/01-dobry-den-image.png".into()
            )
        );
        assert!(dir.path().join("japanese-basics/03-kocka-image.png").is_file());
        assert_eq!(images.prompts.lock().unwrap()[0], "icon of Dobrý den");

        let (_, handle) = generator
            .spawn_generation("japanese-basics", GenerateRequest::default())
            .await
            .unwrap();
        let second = handle.await.unwrap();

        assert_eq!(second.reused(), 6);
        assert_eq!(speech.calls.load(Ordering::SeqCst), 3);
        assert_eq!(images.prompts.lock().unwrap().len(), 3);

        // Stored URLs stay clean; reads are version-stamped.
        let deck = generator.get_deck("japanese-basics").await.unwrap();
        let version = deck.version.unwrap();
        // "いぬ" has no reading and slugs to nothing.
        assert_eq!(
            deck.cards[1].media.as_ref().unwrap().audio_front,
            Some(format!(
                "http://localhost:8080/media/japanese-basics/02--audio.mp3?v={version}"
            ))
        );
        let registry = generator.registry.read().await;
        let stored = &registry.decks["japanese-basics"].cards[0];
        assert!(!stored.media.as_ref().unwrap().image.as_ref().unwrap().contains("?v="));
    }

    #[tokio::test]
    async fn failed_asset_leaves_field_absent() {
        let dir = TempDir::new().unwrap();
        let speech = Arc::new(FakeSpeech {
            fail: true,
            ..Default::default()
        });
        let generator = Arc::new(generator(&dir).await.with_speech(speech));

        let (_, handle) = generator
            .spawn_generation("japanese-basics", GenerateRequest::default())
            .await
            .unwrap();
        let report = handle.await.unwrap();

        assert_eq!(report.failed(), 3);
        assert_matches!(report.cards[0].audio, AssetOutcome::Failed(_));

        let deck = generator.get_deck("japanese-basics").await.unwrap();
        assert!(deck.cards.iter().all(|c| c.media.is_none()));
        assert!(deck.cards.iter().all(|c| c.media_status == Some(MediaStatus::Ready)));
        assert_eq!(
            generator.get_status("japanese-basics").await.unwrap().status,
            GenerationState::Completed
        );
    }

    #[tokio::test]
    async fn subset_request_only_touches_selected_cards() {
        let dir = TempDir::new().unwrap();
        let generator = Arc::new(generator(&dir).await.with_images(Arc::new(FakeImages::default())));

        let request = GenerateRequest {
            cards: vec![
                CardInput {
                    id: "c3".into(),
                    ..Default::default()
                },
                CardInput {
                    id: "missing".into(),
                    ..Default::default()
                },
            ],
        };
        let (status, handle) = generator
            .spawn_generation("japanese-basics", request)
            .await
            .unwrap();
        assert_eq!(status.total_cards, 1);

        let report = handle.await.unwrap();
        assert_eq!(report.cards.len(), 1);
        assert_eq!(report.cards[0].index, 3);

        let deck = generator.get_deck("japanese-basics").await.unwrap();
        assert!(deck.cards[0].media_status.is_none());
        assert_eq!(deck.cards[2].media_status, Some(MediaStatus::Ready));
        assert_eq!(generator.get_status("japanese-basics").await.unwrap().progress, 1);
    }

    #[tokio::test]
    async fn overlapping_runs_are_serialized_and_latest_owns_status() {
        let dir = TempDir::new().unwrap();
        let gate = Arc::new(Semaphore::new(0));
        let speech = Arc::new(FakeSpeech {
            gate: Some(gate.clone()),
            ..Default::default()
        });
        let generator = Arc::new(generator(&dir).await.with_speech(speech.clone()));

        let (_, first) = generator
            .spawn_generation("japanese-basics", GenerateRequest::default())
            .await
            .unwrap();

        // Wait until the first run is blocked inside the vendor call.
        while speech.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let (status, second) = generator
            .spawn_generation("japanese-basics", GenerateRequest::default())
            .await
            .unwrap();
        assert_eq!(status.progress, 0);

        let pending = generator.get_status("japanese-basics").await.unwrap();
        assert_eq!(pending.status, GenerationState::Generating);
        assert_eq!(pending.progress, 0);

        gate.add_permits(3);
        let first = first.await.unwrap();
        assert!(first.superseded);
        assert_eq!(first.cards.len(), 3);

        let second = second.await.unwrap();
        assert!(!second.superseded);
        assert_eq!(second.reused(), 3);
        assert_eq!(speech.calls.load(Ordering::SeqCst), 3);

        let status = generator.get_status("japanese-basics").await.unwrap();
        assert_eq!(status.status, GenerationState::Completed);
        assert_eq!(status.progress, 3);
    }

    #[tokio::test]
    async fn progress_advances_one_card_at_a_time() {
        let dir = TempDir::new().unwrap();
        let gate = Arc::new(Semaphore::new(0));
        let speech = Arc::new(FakeSpeech {
            gate: Some(gate.clone()),
            ..Default::default()
        });
        let generator = Arc::new(generator(&dir).await.with_speech(speech.clone()));

        let (_, handle) = generator
            .spawn_generation("japanese-basics", GenerateRequest::default())
            .await
            .unwrap();

        let mut seen = Vec::new();
        for step in 1..=3 {
            // Card `step` is blocked in the vendor call; earlier cards are applied.
            while speech.calls.load(Ordering::SeqCst) < step {
                tokio::task::yield_now().await;
            }
            let status = generator.get_status("japanese-basics").await.unwrap();
            assert_eq!(status.status, GenerationState::Generating);
            seen.push(status.progress);
            gate.add_permits(1);
        }

        handle.await.unwrap();
        let done = generator.get_status("japanese-basics").await.unwrap();
        seen.push(done.progress);

        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert_eq!(done.status, GenerationState::Completed);
        assert_eq!(done.progress, done.total_cards);
    }

    #[tokio::test]
    async fn duplicate_card_ids_are_filled_by_position() {
        let dir = TempDir::new().unwrap();
        let generator = Arc::new(generator(&dir).await.with_images(Arc::new(FakeImages::default())));
        let mut dup = deck();
        dup.id = "dup".into();
        dup.cards = vec![Card::new("same", "a", "pes"), Card::new("same", "b", "kočka")];
        generator.create_deck(dup).await.unwrap();

        let (_, handle) = generator
            .spawn_generation("dup", GenerateRequest::default())
            .await
            .unwrap();
        handle.await.unwrap();

        let registry = generator.registry.read().await;
        let cards = &registry.decks["dup"].cards;
        assert!(cards.iter().all(|c| c.media_status == Some(MediaStatus::Ready)));
        assert_eq!(
            cards[0].media.as_ref().unwrap().image.as_deref(),
            Some("http://localhost:8080/media/dup/01-pes-image.png")
        );
        assert_eq!(
            cards[1].media.as_ref().unwrap().image.as_deref(),
            Some("http://localhost:8080/media/dup/02-kocka-image.png")
        );
    }

    #[tokio::test]
    async fn catalog_is_sorted_and_priced() {
        let dir = TempDir::new().unwrap();
        let generator = generator(&dir).await;
        let mut paid = deck();
        paid.id = "czech-food".into();
        generator.create_deck(paid).await.unwrap();

        let catalog = generator.get_catalog().await;

        let ids: Vec<_> = catalog.decks.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["czech-food", "japanese-basics"]);
        assert_eq!(catalog.decks[0].price, "tier1");
        assert_eq!(catalog.decks[0].iap_product_id.as_deref(), Some("deck.czech-food"));
        assert_eq!(catalog.decks[1].price, "free");
        assert!(dir.path().join("decks/czech-food.json").is_file());
    }
}
