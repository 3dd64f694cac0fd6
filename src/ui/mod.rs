use iced::{
    widget::{button, column, pick_list, text, text_input, Space},
    Element, Length,
};

use crate::domain::{FlowState, Quality};

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    QualitySelected(Quality),
    DownloadPressed,
}

pub fn view(state: &FlowState) -> Element<'_, DownloadMessage> {
    let label = if state.is_in_flight() {
        "Downloading..."
    } else {
        "Download"
    };
    let submit = state
        .can_submit()
        .then_some(DownloadMessage::DownloadPressed);

    column![
        text("Video Downloader").size(32),
        Space::new().height(Length::Fixed(20.0)),
        text("Video URL:").size(16),
        text_input("Paste the video link here...", &state.url)
            .on_input(DownloadMessage::UrlChanged)
            .on_submit(DownloadMessage::DownloadPressed)
            .padding(10),
        pick_list(
            Quality::ALL,
            Some(state.quality),
            DownloadMessage::QualitySelected
        )
        .padding(10),
        Space::new().height(Length::Fixed(10.0)),
        text(state.last_error().unwrap_or_default()).size(14),
        Space::new().height(Length::Fixed(20.0)),
        button(label).on_press_maybe(submit).padding([10, 20]),
    ]
    .padding(20)
    .spacing(10)
    .into()
}
