//! Image generation capability and the Google Imagen client.

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::MediaError;
use crate::http::ensure_success;

/// Public Generative Language API base URL.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Imagen models tried in order until one returns an image.
pub const IMAGEN_MODELS: &[&str] = &[
    "imagen-3.0-generate-002",
    "imagen-3.0-generate-001",
    "imagen-3.0-fast-generate-001",
];

/// Turns a text prompt into encoded image bytes (PNG).
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, MediaError>;
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: [Instance<'a>; 1],
    parameters: PredictParams,
}

#[derive(Debug, Serialize)]
struct Instance<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParams {
    sample_count: u32,
    aspect_ratio: &'static str,
    person_generation: &'static str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: String,
}

/// HTTP client for the Imagen `:predict` endpoint.
pub struct ImagenClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    models: Vec<String>,
}

impl ImagenClient {
    /// Create a client against the public API with the default model list.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GEMINI_BASE_URL.to_string())
    }

    /// Create a client against an alternative base URL (proxies, test stubs).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            models: IMAGEN_MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Replace the ordered model fallback list.
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    async fn generate_with_model(&self, model: &str, prompt: &str) -> Result<Vec<u8>, MediaError> {
        let body = PredictRequest {
            instances: [Instance { prompt }],
            parameters: PredictParams {
                sample_count: 1,
                aspect_ratio: "1:1",
                person_generation: "dont_allow",
            },
        };

        let response = self
            .client
            .post(format!("{}/models/{}:predict", self.base_url, model))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let parsed: PredictResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Decode(e.to_string()))?;

        let encoded = parsed
            .predictions
            .into_iter()
            .next()
            .map(|p| p.bytes_base64_encoded)
            .filter(|b| !b.is_empty())
            .ok_or(MediaError::EmptyResponse)?;

        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| MediaError::Decode(format!("invalid base64 image: {e}")))
    }
}

#[async_trait]
impl ImageGenerator for ImagenClient {
    /// Try each configured model in order; the first image wins. When every
    /// model fails the last error is returned.
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, MediaError> {
        let mut last_error = None;

        for model in &self.models {
            match self.generate_with_model(model, prompt).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "Image model failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| MediaError::NotConfigured("no image models".into())))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::post;
    use axum::{Json, Router};

    use super::*;

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    /// Stub that rejects `imagen-3.0-generate-002` and answers every other
    /// model with a tiny payload. Counts calls.
    async fn predict(
        State(calls): State<Arc<AtomicUsize>>,
        Path(model_action): Path<String>,
    ) -> Response {
        calls.fetch_add(1, Ordering::SeqCst);
        if model_action.starts_with("imagen-3.0-generate-002") {
            return (StatusCode::NOT_FOUND, "model not found").into_response();
        }
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"PNGDATA");
        Json(serde_json::json!({
            "predictions": [{ "bytesBase64Encoded": encoded, "mimeType": "image/png" }]
        }))
        .into_response()
    }

    fn stub_router(calls: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route("/models/{model_action}", post(predict))
            .with_state(calls)
    }

    #[tokio::test]
    async fn falls_back_to_next_model() {
        let calls = Arc::new(AtomicUsize::new(0));
        let base = spawn_stub(stub_router(Arc::clone(&calls))).await;
        let client = ImagenClient::with_base_url("key".into(), base);

        let image = client.generate("a dog").await.unwrap();

        assert_eq!(image, b"PNGDATA");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn all_models_failing_returns_last_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let base = spawn_stub(stub_router(Arc::clone(&calls))).await;
        let client = ImagenClient::with_base_url("key".into(), base)
            .with_models(vec!["imagen-3.0-generate-002".into()]);

        let err = client.generate("a dog").await.unwrap_err();

        assert_matches!(err, MediaError::Api { status: 404, .. });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_model_list_is_not_configured() {
        let client = ImagenClient::with_base_url("key".into(), "http://127.0.0.1:9".into())
            .with_models(Vec::new());

        let err = client.generate("a dog").await.unwrap_err();

        assert_matches!(err, MediaError::NotConfigured(_));
    }

    #[tokio::test]
    async fn empty_predictions_is_an_error() {
        let base = spawn_stub(Router::new().route(
            "/models/{model_action}",
            post(|| async { Json(serde_json::json!({ "predictions": [] })) }),
        ))
        .await;
        let client = ImagenClient::with_base_url("key".into(), base)
            .with_models(vec!["imagen-3.0-generate-001".into()]);

        let err = client.generate("a dog").await.unwrap_err();

        assert_matches!(err, MediaError::EmptyResponse);
    }
}
