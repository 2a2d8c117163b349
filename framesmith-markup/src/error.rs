use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    #[error("Please enter HTML/JSX code to parse")]
    EmptySnippet,

    #[error("No iframe element found in the provided code")]
    NoIframeFound,

    /// Anything that went wrong while pulling attributes out of a located tag.
    /// The detail is kept for logs; users only ever see the generic message.
    #[error("Error parsing the provided code. Please check the format.")]
    Extraction { detail: String },

    #[error("Invalid value '{value}' for {field}. Expected one of: {expected}")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: String,
    },
}

impl From<regex::Error> for MarkupError {
    fn from(err: regex::Error) -> Self {
        MarkupError::Extraction {
            detail: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MarkupError>;
