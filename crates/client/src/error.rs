use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{endpoint}: expected status {expected:?}, got {actual}")]
    UnexpectedStatus {
        endpoint: &'static str,
        expected: Vec<u16>,
        actual: StatusCode,
    },
    #[error("invalid server base url: {0}")]
    InvalidUrl(String),
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// The offending status, for [`ClientError::UnexpectedStatus`].
    pub fn unexpected_status(&self) -> Option<StatusCode> {
        match self {
            Self::UnexpectedStatus { actual, .. } => Some(*actual),
            _ => None,
        }
    }
}
