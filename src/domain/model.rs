use std::fmt;

use serde::Serialize;

use super::DownloadError;

/// Quality tier requested from the media service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Best,
}

impl Quality {
    pub const ALL: &[Quality] = &[Quality::Best];

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Best => "best",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Best => f.write_str("Best quality"),
        }
    }
}

/// Body of `POST /api/download`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadRequest {
    url: String,
    quality: Quality,
}

impl DownloadRequest {
    pub fn new(url: &str, quality: Quality) -> Result<Self, DownloadError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(DownloadError::Validation);
        }

        Ok(Self {
            url: url.to_string(),
            quality,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FlowStatus {
    #[default]
    Idle,
    InFlight,
    /// Idle, with the message of the last failed submission.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowAction {
    UrlEdited(String),
    QualitySelected(Quality),
    Submitted,
    /// The submission reached a terminal outcome, with an error message if it failed.
    Settled(Option<String>),
}

/// Form state. Only replaced as a whole through [`FlowState::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowState {
    pub url: String,
    pub quality: Quality,
    pub status: FlowStatus,
}

impl FlowState {
    pub fn apply(&self, action: FlowAction) -> FlowState {
        match action {
            FlowAction::UrlEdited(url) => FlowState {
                url,
                ..self.clone()
            },
            FlowAction::QualitySelected(quality) => FlowState {
                quality,
                ..self.clone()
            },
            FlowAction::Submitted if self.is_in_flight() => self.clone(),
            FlowAction::Submitted => FlowState {
                status: FlowStatus::InFlight,
                ..self.clone()
            },
            FlowAction::Settled(error) => FlowState {
                status: error.map_or(FlowStatus::Idle, FlowStatus::Failed),
                ..self.clone()
            },
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.status == FlowStatus::InFlight
    }

    pub fn can_submit(&self) -> bool {
        !self.is_in_flight()
    }

    pub fn last_error(&self) -> Option<&str> {
        match &self.status {
            FlowStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_rejects_blank_urls() {
        for url in ["", " ", "\t\n", "   \r\n  "] {
            assert_eq!(
                DownloadRequest::new(url, Quality::Best),
                Err(DownloadError::Validation),
                "{url:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_request_serializes_url_and_quality() {
        let request = DownloadRequest::new("  https://youtu.be/abc  ", Quality::Best).unwrap();
        assert_eq!(request.url(), "https://youtu.be/abc");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({ "url": "https://youtu.be/abc", "quality": "best" })
        );
    }

    #[test]
    fn test_in_flight_until_settled() {
        let state = FlowState::default().apply(FlowAction::UrlEdited("https://x".into()));
        assert!(state.can_submit());

        let state = state.apply(FlowAction::Submitted);
        assert!(state.is_in_flight());
        assert!(!state.can_submit());

        let done = state.apply(FlowAction::Settled(None));
        assert_eq!(done.status, FlowStatus::Idle);
        assert_eq!(done.url, "https://x");

        let failed = state.apply(FlowAction::Settled(Some("Error: nope".into())));
        assert!(!failed.is_in_flight());
        assert!(failed.can_submit());
        assert_eq!(failed.last_error(), Some("Error: nope"));
    }

    #[test]
    fn test_submit_while_in_flight_is_ignored() {
        let state = FlowState::default().apply(FlowAction::Submitted);
        assert_eq!(state.apply(FlowAction::Submitted), state);
    }

    #[test]
    fn test_resubmit_clears_previous_error() {
        let state = FlowState::default()
            .apply(FlowAction::Submitted)
            .apply(FlowAction::Settled(Some("Error: nope".into())))
            .apply(FlowAction::Submitted);
        assert_eq!(state.status, FlowStatus::InFlight);
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn test_quality_wire_name() {
        assert_eq!(Quality::Best.as_str(), "best");
        assert_eq!(Quality::default(), Quality::Best);
    }
}
