#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL, e.g. https://127.0.0.1:8443
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}
