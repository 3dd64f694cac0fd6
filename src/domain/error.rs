use thiserror::Error;

/// Fallback shown when the media service rejects a request without a message.
pub const SERVICE_FALLBACK: &str = "Download failed";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownloadError {
    #[error("Please enter a valid video URL.")]
    Validation,

    #[error("Error: {0}")]
    Service(String),

    #[error("Failed to download the video: {0}")]
    Transport(String),
}

impl DownloadError {
    pub fn service(message: Option<String>) -> Self {
        Self::Service(
            message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| SERVICE_FALLBACK.to_string()),
        )
    }

    /// Text for the blocking alert. Transport details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => "Failed to download the video.".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_falls_back_to_generic_message() {
        assert_eq!(
            DownloadError::service(None).user_message(),
            "Error: Download failed"
        );
        assert_eq!(
            DownloadError::service(Some("  ".into())).user_message(),
            "Error: Download failed"
        );
        assert_eq!(
            DownloadError::service(Some("Video unavailable".into())).user_message(),
            "Error: Video unavailable"
        );
    }

    #[test]
    fn test_transport_detail_is_hidden_from_user() {
        let err = DownloadError::Transport("connection refused".into());
        assert_eq!(err.user_message(), "Failed to download the video.");
        assert!(err.to_string().contains("connection refused"));
    }
}
