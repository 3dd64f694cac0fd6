use iced::Task;
use tracing::{debug, warn};

use crate::application::{DownloadCoordinator, SubmitOutcome};
use crate::domain::{DownloadError, DownloadRequest, FlowAction, FlowState};
use crate::ui::{self, DownloadMessage};

pub struct DownloadApp {
    flow: FlowState,
    coordinator: DownloadCoordinator,
}

impl DownloadApp {
    pub fn new(coordinator: DownloadCoordinator) -> Self {
        Self {
            flow: FlowState::default(),
            coordinator,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    /// Terminal outcome of a submission, success or not
    DownloadFinished(Result<SubmitOutcome, DownloadError>),
    AlertClosed,
}

/// Blocking native alert, like the browser's `alert()`.
fn alert(message: String) -> Task<Message> {
    Task::perform(
        async move {
            rfd::AsyncMessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title("Video Downloader")
                .set_description(message)
                .set_buttons(rfd::MessageButtons::Ok)
                .show()
                .await;
        },
        |_| Message::AlertClosed,
    )
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(DownloadMessage::UrlChanged(url)) => {
            app.flow = app.flow.apply(FlowAction::UrlEdited(url));
        }
        Message::UiMessage(DownloadMessage::QualitySelected(quality)) => {
            app.flow = app.flow.apply(FlowAction::QualitySelected(quality));
        }
        Message::UiMessage(DownloadMessage::DownloadPressed) => {
            if !app.flow.can_submit() {
                debug!("Download already in progress, ignoring submit");
                return Task::none();
            }

            match DownloadRequest::new(&app.flow.url, app.flow.quality) {
                Ok(request) => {
                    app.flow = app.flow.apply(FlowAction::Submitted);
                    let coordinator = app.coordinator.clone();

                    return Task::perform(
                        async move { coordinator.submit(request).await },
                        Message::DownloadFinished,
                    );
                }
                Err(e) => {
                    warn!("Submit rejected: {}", e);
                    return alert(e.user_message());
                }
            }
        }
        Message::DownloadFinished(result) => {
            let error = result.err().map(|e| e.user_message());
            app.flow = app.flow.apply(FlowAction::Settled(error.clone()));

            if let Some(message) = error {
                return alert(message);
            }
        }
        Message::AlertClosed => {}
    }
    Task::none()
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    ui::view(&app.flow).map(Message::UiMessage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, ApiConfig};
    use crate::application::save_target::DirectorySaveTarget;
    use crate::domain::FlowStatus;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn app() -> DownloadApp {
        let api_client = ApiClient::new(ApiConfig::default()).unwrap();
        let coordinator = DownloadCoordinator::new(
            api_client,
            Arc::new(DirectorySaveTarget::new(std::env::temp_dir())),
            std::env::temp_dir(),
        );
        DownloadApp::new(coordinator)
    }

    fn press(app: &mut DownloadApp, message: DownloadMessage) {
        let _ = update(app, Message::UiMessage(message));
    }

    #[test]
    fn test_blank_url_does_not_start_download() {
        let mut app = app();
        press(&mut app, DownloadMessage::UrlChanged("   ".into()));
        press(&mut app, DownloadMessage::DownloadPressed);
        assert_eq!(app.flow.status, FlowStatus::Idle);
    }

    #[test]
    fn test_submit_marks_in_flight_until_finished() {
        let mut app = app();
        press(&mut app, DownloadMessage::UrlChanged("https://youtu.be/abc".into()));
        press(&mut app, DownloadMessage::DownloadPressed);
        assert!(app.flow.is_in_flight());

        let _ = update(
            &mut app,
            Message::DownloadFinished(Ok(SubmitOutcome::Saved(PathBuf::from("video.mp4")))),
        );
        assert_eq!(app.flow.status, FlowStatus::Idle);
    }

    #[test]
    fn test_failure_clears_in_flight_and_keeps_message() {
        let mut app = app();
        press(&mut app, DownloadMessage::UrlChanged("https://youtu.be/abc".into()));
        press(&mut app, DownloadMessage::DownloadPressed);

        let _ = update(
            &mut app,
            Message::DownloadFinished(Err(DownloadError::Transport("reset".into()))),
        );
        assert!(!app.flow.is_in_flight());
        assert_eq!(app.flow.last_error(), Some("Failed to download the video."));
    }
}
