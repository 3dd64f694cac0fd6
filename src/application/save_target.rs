use std::path::PathBuf;

use async_trait::async_trait;

/// Decides where a finished download is written.
#[async_trait]
pub trait SaveTarget: Send + Sync {
    /// `None` means the user declined to save.
    async fn choose_destination(&self, suggested_filename: &str) -> Option<PathBuf>;

    /// Whether an existing file at the chosen path may be replaced. Otherwise a
    /// numbered name like `video (1).mp4` is used.
    fn replaces_existing(&self) -> bool {
        false
    }
}

/// Native "Save as" dialog, pre-filled with the suggested name.
#[derive(Debug, Clone, Default)]
pub struct DialogSaveTarget;

#[async_trait]
impl SaveTarget for DialogSaveTarget {
    async fn choose_destination(&self, suggested_filename: &str) -> Option<PathBuf> {
        rfd::AsyncFileDialog::new()
            .set_file_name(suggested_filename)
            .add_filter("MP4 video", &["mp4"])
            .save_file()
            .await
            .map(|handle| handle.path().to_path_buf())
    }

    /// The dialog already asked the user before picking an existing file.
    fn replaces_existing(&self) -> bool {
        true
    }
}

/// Saves every download into a fixed directory without asking.
#[derive(Debug, Clone)]
pub struct DirectorySaveTarget {
    dir: PathBuf,
}

impl DirectorySaveTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl SaveTarget for DirectorySaveTarget {
    async fn choose_destination(&self, suggested_filename: &str) -> Option<PathBuf> {
        Some(self.dir.join(suggested_filename))
    }
}
