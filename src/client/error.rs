use thiserror::Error;

/// Failures seen by the API client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status; `message` is its
    /// `error` field when it sent one
    #[error("{message} ({status})")]
    Api { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::InvalidUrl(_) => None,
        }
    }

    /// Text suitable for showing next to the failed view
    pub fn message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
