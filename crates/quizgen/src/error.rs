use std::path::{Path, PathBuf};

/// Errors raised while fetching, downloading, or writing quiz content.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("failed to decode {what}: {message}")]
    Decode { what: &'static str, message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image conversion failed: {0}")]
    Conversion(String),

    #[error("unknown quiz type: {0}")]
    UnknownType(String),
}

impl QuizError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
