use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Body of the `/title` request
#[derive(Debug, Clone, Serialize)]
pub struct TitleRequest<'a> {
    pub url: &'a str,
}

/// Response from the `/title` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TitleResponse {
    #[serde(default)]
    pub title: Option<String>,
}

/// Error body returned by either endpoint on a non-2xx status
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub title_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
                .to_string(),
            connect_timeout: Duration::from_secs(15),
            title_timeout: Duration::from_secs(20),
        }
    }
}
