use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures that abort a run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("YouTube Data API quota exhausted: {0}")]
    Quota(String),

    #[error("{action} `{}`: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("transcript service could not be initialised: {0}")]
    TranscriptSetup(String),
}

impl Error {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("the API key was rejected: {0}")]
    InvalidCredential(String),

    #[error("channel `{0}` could not be resolved")]
    ChannelNotFound(String),

    #[error("YouTube Data API request failed ({status}): {message}")]
    Request { status: u16, message: String },

    #[error("YouTube Data API could not be reached: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected YouTube Data API response: {0}")]
    Malformed(String),
}

/// Per-video caption failures. These never abort a run.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("transcript request for `{video_id}` failed: {message}")]
pub struct TranscriptServiceError {
    pub video_id: String,
    pub message: String,
}
