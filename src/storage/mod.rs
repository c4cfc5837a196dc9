use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Media file not found: {0}")]
    NotFound(String),

    #[error("Refusing to serve stored name '{0}'")]
    InvalidName(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Local media store. Images live under `images/` and are served statically
/// under `/public`; videos live under `videos/` and are only ever streamed by
/// the gated recipe-video handler.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    pub fn videos_dir(&self) -> PathBuf {
        self.root.join("videos")
    }

    /// Resolve a stored video filename. Names are generated at upload time
    /// and are plain file names, so anything carrying a path component is
    /// rejected outright.
    pub fn video_path(&self, stored_name: &str) -> Result<PathBuf, StorageError> {
        if !is_plain_file_name(stored_name) {
            return Err(StorageError::InvalidName(stored_name.to_string()));
        }
        Ok(self.videos_dir().join(stored_name))
    }

    /// Open a stored video for streaming, returning the handle and its length.
    pub async fn open_video(&self, stored_name: &str) -> Result<(File, u64), StorageError> {
        let path = self.video_path(stored_name)?;
        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(stored_name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let len = file.metadata().await?.len();
        Ok((file, len))
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
        && Path::new(name).file_name().map(|f| f == name).unwrap_or(false)
}
