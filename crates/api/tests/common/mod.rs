#![allow(dead_code)]

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use flashdeck_api::config::{IapConfig, MediaConfig, ServerConfig};
use flashdeck_api::engine::DeckGenerator;
use flashdeck_api::router::build_app_router;
use flashdeck_api::state::AppState;
use flashdeck_core::models::{Card, Deck};
use flashdeck_iap::{IapError, ReceiptValidator, ReceiptVerifier, VerifyRequest, VerifyResponse};
use flashdeck_media::storage::LocalStorage;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

pub const PRODUCT_PREFIX: &str = "com.example.duolingocards.deck.";

/// Build a test `ServerConfig` rooted at `storage_path`.
pub fn test_config(storage_path: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        media: MediaConfig {
            elevenlabs_api_key: String::new(),
            google_api_key: String::new(),
            storage_path,
            storage_base_url: "http://localhost:8080/media".to_string(),
        },
        iap: IapConfig {
            apple_shared_secret: String::new(),
            google_package_name: "com.example.duolingocards".to_string(),
            sandbox_mode: true,
            product_prefix: PRODUCT_PREFIX.to_string(),
            free_decks: HashSet::from(["japanese-basics".to_string()]),
        },
    }
}

/// Free three-card deck.
pub fn japanese_basics() -> Deck {
    let mut hello = Card::new("jb-1", "こんにちは", "Dobrý den");
    hello.reading = Some("konnichiwa".into());
    let mut thanks = Card::new("jb-2", "ありがとう", "Děkuji");
    thanks.reading = Some("arigatou".into());
    let mut dog = Card::new("jb-3", "いぬ", "Pes");
    dog.reading = Some("inu".into());

    Deck {
        id: "japanese-basics".into(),
        name: "Japanese Basics".into(),
        description: Some("Everyday words".into()),
        card_type: None,
        front_language: "ja".into(),
        back_language: "cs".into(),
        cards: vec![hello, thanks, dog],
        media_base_url: None,
        image_prompt_template: None,
        tts_voice_id: None,
        version: None,
        price: None,
    }
}

/// Paid deck with seven cards (more than a preview holds).
pub fn spanish_verbs() -> Deck {
    let verbs = ["ser", "estar", "tener", "hacer", "ir", "poder", "decir"];
    Deck {
        id: "spanish-verbs".into(),
        name: "Spanish Verbs".into(),
        description: None,
        card_type: None,
        front_language: "es".into(),
        back_language: "en".into(),
        cards: verbs
            .iter()
            .enumerate()
            .map(|(i, v)| Card::new(format!("sv-{i}"), *v, format!("to {v}")))
            .collect(),
        media_base_url: None,
        image_prompt_template: None,
        tts_voice_id: None,
        version: None,
        price: None,
    }
}

/// Verifier that accepts the receipt `"good"`, fails on `"unreachable"`,
/// and rejects everything else.
pub struct FakeStore;

#[async_trait]
impl ReceiptVerifier for FakeStore {
    async fn verify(&self, request: &VerifyRequest) -> Result<VerifyResponse, IapError> {
        match request.receipt_data.as_str() {
            "good" => Ok(VerifyResponse::valid(
                request.deck_id.clone(),
                Some(request.product_id.clone()),
            )),
            "unreachable" => Err(IapError::Decode("connection reset".into())),
            _ => Ok(VerifyResponse::invalid("product not found in receipt")),
        }
    }
}

/// A running test application and the temp dir backing its storage.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub dir: TempDir,
}

/// Build the full application router over a temp storage root seeded with
/// [`japanese_basics`] and [`spanish_verbs`].
pub async fn build_test_app() -> TestApp {
    build_test_app_with(|generator| generator).await
}

/// Like [`build_test_app`], letting the caller attach media clients.
pub async fn build_test_app_with(
    customize: impl FnOnce(DeckGenerator) -> DeckGenerator,
) -> TestApp {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path().to_path_buf());

    let storage = Arc::new(LocalStorage::new(
        &config.media.storage_path,
        &config.media.storage_base_url,
    ));
    storage.save_deck(&japanese_basics()).await.unwrap();
    storage.save_deck(&spanish_verbs()).await.unwrap();

    let generator = customize(DeckGenerator::new(storage, config.iap.pricing()));
    generator.load_from_storage().await.unwrap();

    let state = AppState {
        generator: Arc::new(generator),
        receipts: Arc::new(ReceiptValidator::with_verifiers(
            Arc::new(FakeStore),
            Arc::new(FakeStore),
        )),
    };

    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PUT, uri, body).await
}

pub async fn post_empty(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn send_json(app: &Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Poll the status endpoint until the run reports `completed`.
pub async fn wait_for_completion(app: &Router, deck_id: &str) -> serde_json::Value {
    let uri = format!("/api/decks/{deck_id}/status");
    for _ in 0..500 {
        let json = body_json(get(app, &uri).await).await;
        if json["status"] == "completed" {
            return json;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("generation for {deck_id} did not complete");
}
