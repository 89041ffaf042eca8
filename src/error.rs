use async_openai::error::OpenAIError;
use derive_more::{Display, From};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, From)]
pub enum Error {
    /// Input rejected before any network call was made.
    #[display("Invalid input: {_0}")]
    #[from(skip)]
    Validation(String),

    #[display("YouTube request failed: {_0}")]
    Transport(TransportError),

    #[display("Question extraction failed: {_0}")]
    Completion(OpenAIError),

    #[display("Question extraction failed: the completion service returned no text")]
    #[from(skip)]
    EmptyCompletion,

    #[display("I/O error: {_0}")]
    Io(std::io::Error),

    #[display("Serialization error: {_0}")]
    Json(serde_json::Error),

    #[display("{_0}")]
    #[from(skip)]
    Custom(String),
}

impl Error {
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Completion(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) | Self::EmptyCompletion | Self::Custom(_) => None,
        }
    }
}

// Request URLs carry the API key as a query parameter, so they never reach the message.
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(TransportError::Http(e.without_url()))
    }
}

/// Failure talking to the YouTube Data API.
#[derive(Debug, Display)]
pub enum TransportError {
    #[display("{_0}")]
    Http(reqwest::Error),

    /// Non-2xx status; `message` is the API's own error text when it sent one.
    #[display("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[display("malformed {context} response: {source}")]
    Malformed {
        context: &'static str,
        source: serde_json::Error,
    },

    #[display("statistic {field} is not an integer: {value:?}")]
    InvalidStatistic { field: &'static str, value: String },
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::Malformed { source, .. } => Some(source),
            Self::Status { .. } | Self::InvalidStatistic { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_displayable() {
        let err = Error::validation("video id cannot be empty");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Invalid input: video id cannot be empty");
    }

    #[test]
    fn status_error_carries_api_message() {
        let err = Error::from(TransportError::Status {
            status: 403,
            message: "quotaExceeded".to_string(),
        });
        assert_eq!(err.to_string(), "YouTube request failed: HTTP 403: quotaExceeded");
    }
}
