use centerfind_client::ClientError;
use centerfind_core::labels::error_message;
use thiserror::Error;

/// Failure of a search flow, classified by where it happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The backend rejected the address lookup.
    #[error("address lookup failed: {0}")]
    Geocode(String),

    /// The backend rejected the center search.
    #[error("center search failed: {0}")]
    SearchRequest(String),

    /// No usable response arrived.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl SearchError {
    /// Classify a geocode failure.
    #[must_use]
    pub fn from_geocode(err: &ClientError) -> Self {
        match err.api_message() {
            Some(message) => Self::Geocode(message.to_string()),
            None => Self::Transport(err.to_string()),
        }
    }

    /// Classify a center search failure.
    #[must_use]
    pub fn from_search(err: &ClientError) -> Self {
        match err.api_message() {
            Some(message) => Self::SearchRequest(message.to_string()),
            None => Self::Transport(err.to_string()),
        }
    }

    /// Text for the error region. Transport failures are never shown.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Geocode(message) | Self::SearchRequest(message) => Some(error_message(message)),
            Self::Transport(_) => None,
        }
    }
}
