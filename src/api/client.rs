use reqwest::header::USER_AGENT;
use reqwest::{Client, Response, StatusCode};
use thiserror::Error;
use tracing::debug;

use super::models::{ApiConfig, ErrorResponse, TitleRequest, TitleResponse};
use crate::domain::DownloadRequest;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Server rejected the request ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Response has no title")]
    MissingTitle,
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self { config, http })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Parse the `{ "error": ... }` body of a failed response, if there is one.
    async fn rejection(response: Response) -> ApiError {
        let status = response.status();
        let message = match response.bytes().await {
            Ok(body) => serde_json::from_slice::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error),
            Err(e) => {
                debug!(error = %e, "Could not read error body");
                None
            }
        };

        ApiError::Rejected { status, message }
    }

    /// Ask the download service for the media. The body is left unread.
    pub async fn request_media(&self, request: &DownloadRequest) -> Result<Response> {
        let response = self
            .http
            .post(self.endpoint("download"))
            .header(USER_AGENT, &self.config.user_agent)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        Ok(response)
    }

    /// Resolve a human readable title for the video.
    pub async fn fetch_title(&self, url: &str) -> Result<String> {
        let response = self
            .http
            .post(self.endpoint("title"))
            .timeout(self.config.title_timeout)
            .json(&TitleRequest { url })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let body: TitleResponse = response.json().await?;
        body.title.ok_or(ApiError::MissingTitle)
    }
}
