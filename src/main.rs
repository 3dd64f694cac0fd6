mod api;
mod app;
mod application;
mod config;
mod domain;
mod logging;
mod ui;
mod utils;

use tracing::info;

use crate::application::DownloadCoordinator;
use crate::config::Config;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    info!(
        api = %config.api.base_url,
        save_dir = ?config.save_dir,
        "Starting video downloader"
    );
    let coordinator = DownloadCoordinator::from_config(&config)?;

    iced::application(
        move || app::DownloadApp::new(coordinator.clone()),
        app::update,
        app::view,
    )
    .title("Video Downloader")
    .run()?;

    Ok(())
}
