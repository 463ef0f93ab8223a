use std::net::SocketAddr;
use std::sync::Arc;

use flashdeck_iap::ReceiptValidator;
use flashdeck_media::image::ImagenClient;
use flashdeck_media::storage::LocalStorage;
use flashdeck_media::tts::ElevenLabsClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flashdeck_api::config::ServerConfig;
use flashdeck_api::engine::DeckGenerator;
use flashdeck_api::router::build_app_router;
use flashdeck_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flashdeck_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let storage = Arc::new(LocalStorage::new(
        &config.media.storage_path,
        &config.media.storage_base_url,
    ));

    // --- Generator ---
    let mut generator = DeckGenerator::new(Arc::clone(&storage), config.iap.pricing());

    if config.media.elevenlabs_api_key.is_empty() {
        tracing::warn!("ELEVENLABS_API_KEY not set, audio generation disabled");
    } else {
        generator = generator.with_speech(Arc::new(ElevenLabsClient::new(
            config.media.elevenlabs_api_key.clone(),
        )));
    }

    if config.media.google_api_key.is_empty() {
        tracing::warn!("GOOGLE_API_KEY not set, image generation disabled");
    } else {
        generator = generator.with_images(Arc::new(ImagenClient::new(
            config.media.google_api_key.clone(),
        )));
    }

    let deck_count = generator
        .load_from_storage()
        .await
        .expect("Failed to load decks from storage");
    tracing::info!(deck_count, path = %storage.base_path().display(), "Decks loaded");

    // --- Receipts ---
    let receipts = ReceiptValidator::new(
        &config.iap.apple_shared_secret,
        &config.iap.google_package_name,
        config.iap.sandbox_mode,
    );
    tracing::info!(sandbox = config.iap.sandbox_mode, "Receipt validator ready");

    // --- App state ---
    let state = AppState {
        generator: Arc::new(generator),
        receipts: Arc::new(receipts),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix). Background
/// generation runs are not awaited; any run in flight is abandoned.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
