//! Local storage for images attached to messages.

use std::path::PathBuf;

use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

/// URL prefix under which stored images are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Uploaded image is empty.")]
    Empty,

    #[error("Image of {size} bytes exceeds {max} bytes.")]
    TooLarge { size: usize, max: usize },

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Image storage error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    base_path: PathBuf,
    max_size: usize,
}

impl Default for MediaStore {
    fn default() -> Self {
        Self::new(PathBuf::from("./uploads"), DEFAULT_MAX_IMAGE_BYTES)
    }
}

impl MediaStore {
    pub fn new(base_path: PathBuf, max_size: usize) -> Self {
        Self {
            base_path,
            max_size,
        }
    }

    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Checks an upload without touching the disk.
    pub fn check(&self, content_type: &str, size: usize) -> Result<&'static str, MediaError> {
        if size == 0 {
            return Err(MediaError::Empty);
        }
        if size > self.max_size {
            return Err(MediaError::TooLarge {
                size,
                max: self.max_size,
            });
        }
        extension_for(content_type).ok_or_else(|| MediaError::UnsupportedType(content_type.to_string()))
    }

    /// Stores the image and returns its public URL.
    pub async fn store_image(&self, content_type: &str, data: &[u8]) -> Result<String, MediaError> {
        let extension = self.check(content_type, data.len())?;

        fs::create_dir_all(&self.base_path).await?;

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        fs::write(self.base_path.join(&file_name), data).await?;

        debug!(file = %file_name, size = data.len(), dir = %self.base_path.display(), "Stored image");
        Ok(format!("{}/{}", PUBLIC_PREFIX, file_name))
    }

    /// Deletes an image previously returned by `store_image`.
    /// URLs outside this store are ignored.
    pub async fn remove_image(&self, url: &str) -> Result<(), MediaError> {
        let Some(file_name) = url
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && !name.starts_with('.'))
        else {
            warn!(url, "Refusing to remove an image outside the upload directory");
            return Ok(());
        };

        match fs::remove_file(self.base_path.join(file_name)).await {
            Ok(()) => {
                debug!(file = %file_name, "Removed image");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}
