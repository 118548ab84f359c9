use std::path::{Path, PathBuf};

use derive_more::Display;
use tokio::fs;
use uuid::Uuid;

use crate::{
    constants::{PROJECT_IMAGES_DIR, PROJECT_IMAGES_URL_PREFIX},
    errors::AppError,
};

const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];
const ALLOWED_CONTENT_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];
const INVALID_FILE_NAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// An uploaded file waiting in temporary storage.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: u64,
    pub source: PathBuf,
}

impl ImageUpload {
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

#[derive(Debug, Display, PartialEq)]
pub enum UploadError {
    #[display("File size cannot exceed {_0} MB.")]
    TooLarge(u64),

    #[display("Only .jpg, .jpeg, .png, .gif and .webp files are allowed.")]
    UnsupportedExtension,

    #[display("Invalid file type.")]
    UnsupportedContentType,

    #[display("Invalid file name.")]
    InvalidFileName,
}

impl std::error::Error for UploadError {}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        AppError::field("image_file", err.to_string())
    }
}

/// Project images on local disk, served from `PROJECT_IMAGES_URL_PREFIX`.
#[derive(Debug, Clone)]
pub struct ImageStorage {
    root: PathBuf,
    max_size: u64,
}

impl ImageStorage {
    pub fn new(web_root: impl Into<PathBuf>, max_size: u64) -> Self {
        ImageStorage {
            root: web_root.into(),
            max_size,
        }
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(PROJECT_IMAGES_DIR)
    }

    /// Checks run in order and stop at the first failure. No file, or an
    /// empty one, is accepted: the upload is optional.
    pub fn validate(&self, upload: Option<&ImageUpload>) -> Result<(), UploadError> {
        let Some(upload) = upload.filter(|u| !u.is_empty()) else {
            return Ok(());
        };

        if upload.size > self.max_size {
            return Err(UploadError::TooLarge(self.max_size / (1024 * 1024)));
        }

        let extension = Path::new(&upload.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        if extension.as_deref().is_none_or(|e| !ALLOWED_EXTENSIONS.contains(&e)) {
            return Err(UploadError::UnsupportedExtension);
        }

        let content_type = upload
            .content_type
            .as_deref()
            .map(|c| c.trim().to_lowercase());
        if content_type.as_deref().is_none_or(|c| !ALLOWED_CONTENT_TYPES.contains(&c)) {
            return Err(UploadError::UnsupportedContentType);
        }

        if !is_valid_file_name(&upload.file_name) {
            return Err(UploadError::InvalidFileName);
        }

        Ok(())
    }

    /// Validates and copies the upload under a unique name. Returns the public
    /// URL, or `None` when nothing was uploaded.
    pub async fn save(&self, upload: Option<&ImageUpload>) -> Result<Option<String>, AppError> {
        self.validate(upload)?;
        let Some(upload) = upload.filter(|u| !u.is_empty()) else {
            return Ok(None);
        };

        let stored_name = format!("{}_{}", Uuid::new_v4(), upload.file_name);
        let dir = self.images_dir();
        fs::create_dir_all(&dir).await?;
        fs::copy(&upload.source, dir.join(&stored_name)).await?;

        tracing::info!(file = %stored_name, size = upload.size, "Stored project image");
        Ok(Some(format!("{PROJECT_IMAGES_URL_PREFIX}{stored_name}")))
    }

    /// Deletes the file behind `url`. URLs outside the project images prefix
    /// and files that are already gone are ignored.
    pub async fn remove(&self, url: &str) -> Result<(), AppError> {
        let Some(path) = self.path_for(url) else {
            return Ok(());
        };

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Cleanup after a successful mutation; a failure is logged and never
    /// returned.
    pub async fn remove_best_effort(&self, url: &str) {
        match self.remove(url).await {
            Ok(()) => tracing::info!(url, "Removed replaced project image"),
            Err(e) => tracing::warn!(url, error = %e, "Failed to remove replaced project image"),
        }
    }

    pub fn path_for(&self, url: &str) -> Option<PathBuf> {
        let name = url.strip_prefix(PROJECT_IMAGES_URL_PREFIX)?;
        is_valid_file_name(name).then(|| self.images_dir().join(name))
    }
}

fn is_valid_file_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name != "."
        && name != ".."
        && !name
            .chars()
            .any(|c| c.is_control() || INVALID_FILE_NAME_CHARS.contains(&c))
}
