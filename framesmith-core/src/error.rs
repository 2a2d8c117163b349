use framesmith_markup::MarkupError;
use thiserror::Error;

/// Every error a session can surface. None of them are fatal: each one is
/// shown inline and cleared by the next action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Please enter a URL")]
    EmptyUrl,

    #[error("Please enter a valid URL")]
    InvalidUrl,

    #[error("Failed to load the URL")]
    FrameLoadFailed,

    #[error(transparent)]
    Snippet(#[from] MarkupError),

    #[error("Nothing to copy yet: enter a URL or parse a snippet first")]
    NothingToCopy,

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
