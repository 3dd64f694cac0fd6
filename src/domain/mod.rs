pub mod error;
pub mod model;

pub use error::DownloadError;
pub use model::{DownloadRequest, FlowAction, FlowState, FlowStatus, Quality};
