//! Local filesystem storage for decks and generated media.
//!
//! Layout under the storage root:
//!
//! ```text
//! {root}/decks/{deck_id}.json      persisted deck
//! {root}/{deck_id}/{filename}      generated media, served at {base_url}/{deck_id}/{filename}
//! ```

use std::path::{Path, PathBuf};

use flashdeck_core::models::Deck;

use crate::error::StorageError;

/// Subdirectory of the storage root holding deck JSON files.
pub const DECKS_DIR: &str = "decks";

/// Filesystem-backed media and deck store.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a storage adapter rooted at `base_path` whose files are
    /// publicly reachable under `base_url`.
    pub fn new(base_path: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_path: base_path.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    // ---- media files ----

    /// Write `data` to `{root}/{deck_id}/{filename}` and return its public URL.
    pub async fn save(
        &self,
        deck_id: &str,
        filename: &str,
        data: &[u8],
    ) -> Result<String, StorageError> {
        let dir = self.base_path.join(deck_id);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::io(&dir, e))?;

        let path = dir.join(filename);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| StorageError::io(&path, e))?;

        Ok(self.build_url(deck_id, filename))
    }

    /// Whether a media file already exists for this deck.
    pub async fn exists(&self, deck_id: &str, filename: &str) -> bool {
        let path = self.media_path(deck_id, filename);
        tokio::fs::try_exists(&path).await.unwrap_or(false)
    }

    /// Public URL of a media file. Pure string construction, no I/O.
    pub fn build_url(&self, deck_id: &str, filename: &str) -> String {
        format!("{}/{}/{}", self.base_url, deck_id, filename)
    }

    pub fn media_path(&self, deck_id: &str, filename: &str) -> PathBuf {
        self.base_path.join(deck_id).join(filename)
    }

    // ---- decks ----

    pub fn decks_dir(&self) -> PathBuf {
        self.base_path.join(DECKS_DIR)
    }

    /// Load every `*.json` deck under `{root}/decks`.
    ///
    /// Creates the directory if it does not exist yet. Files that cannot be
    /// read or parsed are skipped with a warning.
    pub async fn load_decks(&self) -> Result<Vec<Deck>, StorageError> {
        let dir = self.decks_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::io(&dir, e))?;

        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| StorageError::io(&dir, e))?;

        let mut decks = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::io(&dir, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") || !path.is_file() {
                continue;
            }

            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable deck file");
                    continue;
                }
            };

            match serde_json::from_slice::<Deck>(&bytes) {
                Ok(deck) => decks.push(deck),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping invalid deck file");
                }
            }
        }

        Ok(decks)
    }

    /// Persist a deck as pretty-printed JSON to `{root}/decks/{id}.json`.
    pub async fn save_deck(&self, deck: &Deck) -> Result<(), StorageError> {
        let dir = self.decks_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::io(&dir, e))?;

        let json = serde_json::to_vec_pretty(deck).map_err(|source| StorageError::Serialize {
            deck_id: deck.id.clone(),
            source,
        })?;

        let path = dir.join(format!("{}.json", deck.id));
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| StorageError::io(&path, e))
    }
}
