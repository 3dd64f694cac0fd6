use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

use super::save_target::{DialogSaveTarget, DirectorySaveTarget, SaveTarget};
use crate::{
    api::{ApiClient, ApiError},
    config::Config,
    domain::{DownloadError, DownloadRequest},
    utils::{numbered_filename, suggested_filename, DEFAULT_FILENAME},
};

const MAX_NAME_ATTEMPTS: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved(PathBuf),
    /// The payload was fetched but the user closed the save dialog.
    Dismissed,
}

/// Response body staged on disk until it is saved.
struct MediaPayload {
    content_type: Option<String>,
    len: u64,
    staged: NamedTempFile,
}

impl MediaPayload {
    fn path(&self) -> &Path {
        self.staged.path()
    }

    fn release(self) {
        let path = self.staged.path().to_path_buf();
        if let Err(e) = self.staged.close() {
            warn!(path = %path.display(), error = %e, "Failed to remove staged media");
        }
    }
}

#[derive(Clone)]
pub struct DownloadCoordinator {
    api_client: ApiClient,
    save_target: Arc<dyn SaveTarget>,
    staging_dir: PathBuf,
}

impl DownloadCoordinator {
    pub fn new(
        api_client: ApiClient,
        save_target: Arc<dyn SaveTarget>,
        staging_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            api_client,
            save_target,
            staging_dir: staging_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let api_client = ApiClient::new(config.api.clone())?;
        let save_target: Arc<dyn SaveTarget> = match &config.save_dir {
            Some(dir) => Arc::new(DirectorySaveTarget::new(dir)),
            None => Arc::new(DialogSaveTarget),
        };

        Ok(Self::new(api_client, save_target, &config.staging_dir))
    }

    /// Fetch the media, name it after the video title and save it.
    pub async fn submit(&self, request: DownloadRequest) -> Result<SubmitOutcome, DownloadError> {
        info!(url = request.url(), quality = request.quality().as_str(), "Download requested");

        let result = self.run(&request).await;
        match &result {
            Ok(SubmitOutcome::Saved(path)) => info!(path = %path.display(), "Download saved"),
            Ok(SubmitOutcome::Dismissed) => info!("Save dialog dismissed, download discarded"),
            Err(DownloadError::Transport(detail)) => error!(detail = %detail, "Download failed"),
            Err(e) => warn!(error = %e, "Download rejected"),
        }
        result
    }

    async fn run(&self, request: &DownloadRequest) -> Result<SubmitOutcome, DownloadError> {
        let response = self
            .api_client
            .request_media(request)
            .await
            .map_err(|e| match e {
                ApiError::Rejected { message, .. } => DownloadError::service(message),
                other => DownloadError::Transport(other.to_string()),
            })?;

        let title = match self.api_client.fetch_title(request.url()).await {
            Ok(title) => Some(title),
            Err(e) => {
                warn!(error = %e, "Could not resolve video title, using default filename");
                None
            }
        };
        let filename = suggested_filename(title.as_deref());

        let payload = self.stage(response).await?;
        debug!(
            content_type = payload.content_type.as_deref().unwrap_or("unknown"),
            bytes = payload.len,
            filename = %filename,
            "Media staged"
        );

        let outcome = self.save(&payload, &filename).await;
        payload.release();
        outcome
    }

    async fn stage(&self, response: Response) -> Result<MediaPayload, DownloadError> {
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let staged = tempfile::Builder::new()
            .prefix(".video-downloader-")
            .suffix(".part")
            .tempfile_in(&self.staging_dir)
            .map_err(|e| DownloadError::Transport(format!("Failed to create staging file: {}", e)))?;
        let mut file = staged
            .reopen()
            .map(tokio::fs::File::from_std)
            .map_err(|e| DownloadError::Transport(format!("Failed to open staging file: {}", e)))?;

        let mut len = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| DownloadError::Transport(format!("Failed to read media: {}", e)))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| DownloadError::Transport(format!("Write error: {}", e)))?;
            len += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| DownloadError::Transport(format!("Write error: {}", e)))?;
        file.sync_all()
            .await
            .map_err(|e| DownloadError::Transport(format!("Failed to sync file: {}", e)))?;

        Ok(MediaPayload {
            content_type,
            len,
            staged,
        })
    }

    async fn save(
        &self,
        payload: &MediaPayload,
        filename: &str,
    ) -> Result<SubmitOutcome, DownloadError> {
        let Some(destination) = self.save_target.choose_destination(filename).await else {
            return Ok(SubmitOutcome::Dismissed);
        };

        let saved = persist_copy(
            payload.path(),
            &destination,
            self.save_target.replaces_existing(),
        )
        .await
        .map_err(|e| {
            DownloadError::Transport(format!("Failed to save {}: {}", destination.display(), e))
        })?;

        Ok(SubmitOutcome::Saved(saved))
    }
}

/// Copy `source` into a hidden file beside `destination`, then move it into
/// place. A failed copy leaves nothing at the destination. Unless `replace` is
/// set, an existing file is kept and the next free numbered name is used.
async fn persist_copy(source: &Path, destination: &Path, replace: bool) -> io::Result<PathBuf> {
    let dir = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let filename = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

    let mut pending = tempfile::Builder::new()
        .prefix(".video-downloader-")
        .suffix(".part")
        .tempfile_in(dir)?;
    tokio::fs::copy(source, pending.path()).await?;

    if replace {
        pending.persist(destination).map_err(|e| e.error)?;
        return Ok(destination.to_path_buf());
    }

    for n in 0..MAX_NAME_ATTEMPTS {
        let candidate = match n {
            0 => destination.to_path_buf(),
            n => dir.join(numbered_filename(&filename, n)),
        };
        match pending.persist_noclobber(&candidate) {
            Ok(_) => return Ok(candidate),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                debug!(path = %candidate.display(), "Name taken, trying next");
                pending = e.file;
            }
            Err(e) => return Err(e.error),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free name left for {}", destination.display()),
    ))
}
