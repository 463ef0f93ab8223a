//! Media generation clients and on-disk media storage.
//!
//! Provides the [`SpeechSynthesizer`](tts::SpeechSynthesizer) and
//! [`ImageGenerator`](image::ImageGenerator) capabilities with their
//! vendor implementations (ElevenLabs, Google Imagen), plus
//! [`LocalStorage`](storage::LocalStorage) which maps a deck and filename
//! to a path under the storage root and a public URL.

pub mod error;
pub mod image;
pub mod storage;
pub mod tts;

mod http;

pub use error::{MediaError, StorageError};
