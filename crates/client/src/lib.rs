#![forbid(unsafe_code)]

//! HTTP client for the conformance suite server.

pub mod config;
pub mod discovery;
pub mod error;
pub mod validations;

pub use config::ClientConfig;
pub use error::ClientError;

use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};

/// Client for the discovery validation and validation run endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http(Client::new(), config)
    }

    pub fn with_http(http: Client, config: ClientConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Passes `resp` through if its status is one of `expected`.
pub(crate) fn expect_status(
    endpoint: &'static str,
    resp: Response,
    expected: &[StatusCode],
) -> Result<Response, ClientError> {
    let actual = resp.status();
    if expected.contains(&actual) {
        debug!(endpoint, status = actual.as_u16(), "response");
        return Ok(resp);
    }
    warn!(endpoint, status = actual.as_u16(), "unexpected status");
    Err(ClientError::UnexpectedStatus {
        endpoint,
        expected: expected.iter().map(StatusCode::as_u16).collect(),
        actual,
    })
}
