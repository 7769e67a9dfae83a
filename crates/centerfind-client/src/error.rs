use thiserror::Error;

/// Errors returned by the centers API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No usable response: connection failure, timeout, or a body that could
    /// not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status and an error body of the
    /// form `{"message": "..."}`.
    #[error("centers API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// The backend's own message, when it produced a response the user
    /// should hear about.
    ///
    /// Transport failures and unreadable bodies count as "no response".
    #[must_use]
    pub fn api_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }
}
