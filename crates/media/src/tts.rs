//! Text-to-speech capability and the ElevenLabs client.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::MediaError;
use crate::http::ensure_success;

/// Public ElevenLabs API base URL.
pub const ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io/v1";

/// Voice used when a deck does not set `ttsVoiceId` ("Rachel", multilingual).
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";

/// Model that handles non-English scripts such as Japanese.
pub const ELEVENLABS_MODEL_ID: &str = "eleven_multilingual_v2";

/// Turns text into encoded audio bytes (MP3).
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with `voice_id`, or the implementation's default
    /// voice when `None`.
    async fn synthesize(&self, text: &str, voice_id: Option<&str>) -> Result<Vec<u8>, MediaError>;
}

#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f64,
    similarity_boost: f64,
}

/// HTTP client for the ElevenLabs text-to-speech endpoint.
pub struct ElevenLabsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    default_voice_id: String,
}

impl ElevenLabsClient {
    /// Create a client against the public ElevenLabs API.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, ELEVENLABS_BASE_URL.to_string())
    }

    /// Create a client against an alternative base URL (proxies, test stubs).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_voice_id: DEFAULT_VOICE_ID.to_string(),
        }
    }

    pub fn with_default_voice(mut self, voice_id: impl Into<String>) -> Self {
        self.default_voice_id = voice_id.into();
        self
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, text: &str, voice_id: Option<&str>) -> Result<Vec<u8>, MediaError> {
        let voice = match voice_id {
            Some(v) if !v.is_empty() => v,
            _ => &self.default_voice_id,
        };

        let body = TtsRequest {
            text,
            model_id: ELEVENLABS_MODEL_ID,
            voice_settings: VoiceSettings {
                stability: 0.5,
                similarity_boost: 0.75,
            },
        };

        let response = self
            .client
            .post(format!("{}/text-to-speech/{}", self.base_url, voice))
            .header("xi-api-key", &self.api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&body)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(MediaError::EmptyResponse);
        }
        Ok(bytes.to_vec())
    }
}
