pub mod download_coordinator;
pub mod save_target;

pub use download_coordinator::{DownloadCoordinator, SubmitOutcome};
