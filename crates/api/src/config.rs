use std::collections::HashSet;
use std::path::PathBuf;

use crate::engine::Pricing;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Media generation and storage settings.
    pub media: MediaConfig,
    /// Receipt validation and pricing settings.
    pub iap: IapConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default    |
    /// |------------------------|------------|
    /// | `HOST`                 | `0.0.0.0`  |
    /// | `PORT`                 | `8080`     |
    /// | `CORS_ORIGINS`         | `*`        |
    /// | `REQUEST_TIMEOUT_SECS` | `30`       |
    ///
    /// See [`MediaConfig::from_env`] and [`IapConfig::from_env`] for the rest.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = split_list(&std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()));

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            media: MediaConfig::from_env(),
            iap: IapConfig::from_env(),
        }
    }
}

/// Vendor keys and the storage root for generated media.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Empty disables text-to-speech.
    pub elevenlabs_api_key: String,
    /// Empty disables image generation.
    pub google_api_key: String,
    pub storage_path: PathBuf,
    /// Public URL the storage root is served under.
    pub storage_base_url: String,
}

impl MediaConfig {
    /// | Env Var              | Default                       |
    /// |----------------------|-------------------------------|
    /// | `ELEVENLABS_API_KEY` | (empty)                       |
    /// | `GOOGLE_API_KEY`     | (empty)                       |
    /// | `STORAGE_PATH`       | `./media`                     |
    /// | `STORAGE_BASE_URL`   | `http://localhost:8080/media` |
    pub fn from_env() -> Self {
        Self {
            elevenlabs_api_key: std::env::var("ELEVENLABS_API_KEY").unwrap_or_default(),
            google_api_key: std::env::var("GOOGLE_API_KEY").unwrap_or_default(),
            storage_path: std::env::var("STORAGE_PATH")
                .unwrap_or_else(|_| "./media".into())
                .into(),
            storage_base_url: std::env::var("STORAGE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080/media".into()),
        }
    }
}

/// In-app purchase settings.
#[derive(Debug, Clone)]
pub struct IapConfig {
    pub apple_shared_secret: String,
    pub google_package_name: String,
    /// Use store sandboxes (and accept any Google purchase).
    pub sandbox_mode: bool,
    /// Store product id prefix; the deck id is appended.
    pub product_prefix: String,
    /// Decks downloadable without a receipt.
    pub free_decks: HashSet<String>,
}

impl IapConfig {
    /// | Env Var               | Default                           |
    /// |-----------------------|-----------------------------------|
    /// | `APPLE_SHARED_SECRET` | (empty)                           |
    /// | `GOOGLE_PACKAGE_NAME` | `com.example.duolingocards`       |
    /// | `IAP_SANDBOX_MODE`    | `true`                            |
    /// | `IAP_PRODUCT_PREFIX`  | `com.example.duolingocards.deck.` |
    /// | `FREE_DECKS`          | `japanese-basics`                 |
    ///
    /// Sandbox mode is on only when `IAP_SANDBOX_MODE` is exactly `true`.
    pub fn from_env() -> Self {
        Self {
            apple_shared_secret: std::env::var("APPLE_SHARED_SECRET").unwrap_or_default(),
            google_package_name: std::env::var("GOOGLE_PACKAGE_NAME")
                .unwrap_or_else(|_| "com.example.duolingocards".into()),
            sandbox_mode: std::env::var("IAP_SANDBOX_MODE").unwrap_or_else(|_| "true".into())
                == "true",
            product_prefix: std::env::var("IAP_PRODUCT_PREFIX")
                .unwrap_or_else(|_| "com.example.duolingocards.deck.".into()),
            free_decks: split_list(
                &std::env::var("FREE_DECKS").unwrap_or_else(|_| "japanese-basics".into()),
            )
            .into_iter()
            .collect(),
        }
    }

    pub fn pricing(&self) -> Pricing {
        Pricing::new(self.free_decks.clone(), self.product_prefix.clone())
    }
}

/// Split a comma-separated list, trimming entries and dropping empties.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_and_drops_empties() {
        assert_eq!(
            split_list(" japanese-basics, ,czech-food,"),
            vec!["japanese-basics", "czech-food"]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn pricing_carries_prefix_and_free_set() {
        let iap = IapConfig {
            apple_shared_secret: String::new(),
            google_package_name: "pkg".into(),
            sandbox_mode: true,
            product_prefix: "p.".into(),
            free_decks: HashSet::from(["a".to_string()]),
        };
        let pricing = iap.pricing();
        assert_eq!(pricing.product_id("b"), "p.b");
        assert!(pricing.free_decks.contains("a"));
    }
}
