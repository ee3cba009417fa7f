//! Storage for images uploaded as base64 data URLs.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use uuid::Uuid;

/// Folder that recipe images are stored under.
pub const RECIPE_IMAGES_FOLDER: &str = "recipes/images";
/// Folder that user avatars are stored under.
pub const AVATARS_FOLDER: &str = "users";

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("expected a `data:image/<format>;base64,` payload")]
    InvalidDataUrl,
    #[error("unsupported image format `{0}`")]
    UnsupportedFormat(String),
    #[error("image payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("image payload is empty")]
    Empty,
    #[error("reference `{0}` does not point into the media directory")]
    ForeignReference(String),
    #[error("failed to access media storage: {0}")]
    Io(#[from] io::Error),
}

/// Persists image payloads and hands back public references to them.
#[cfg_attr(test, mockall::automock)]
pub trait ImageStore {
    /// Decode `data_url` and store it inside `folder`, returning its public URL.
    fn save(&self, folder: &str, data_url: &str) -> Result<String, ImageError>;
    /// Delete a previously stored image. Missing files are not an error.
    fn remove(&self, reference: &str) -> Result<(), ImageError>;
}

/// Image store backed by a media directory served under `url_prefix`.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
    url_prefix: String,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        let url_prefix = url_prefix.into().trim_end_matches('/').to_string();
        Self {
            root: root.into(),
            url_prefix,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, reference: &str) -> Result<PathBuf, ImageError> {
        let relative = reference
            .strip_prefix(&self.url_prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| ImageError::ForeignReference(reference.to_string()))?;

        let relative = Path::new(relative);
        if !relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
        {
            return Err(ImageError::ForeignReference(reference.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

impl ImageStore for FsImageStore {
    fn save(&self, folder: &str, data_url: &str) -> Result<String, ImageError> {
        let (extension, bytes) = decode_data_url(data_url)?;

        let directory = self.root.join(folder);
        fs::create_dir_all(&directory)?;

        let file_name = format!("{}.{extension}", Uuid::new_v4());
        fs::write(directory.join(&file_name), bytes)?;

        Ok(format!("{}/{folder}/{file_name}", self.url_prefix))
    }

    fn remove(&self, reference: &str) -> Result<(), ImageError> {
        let path = self.resolve(reference)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("image {} already removed", path.display());
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Split a `data:image/<format>;base64,<payload>` URL into a file extension
/// and the decoded bytes.
fn decode_data_url(data_url: &str) -> Result<(&'static str, Vec<u8>), ImageError> {
    let (header, payload) = data_url
        .trim()
        .split_once(";base64,")
        .ok_or(ImageError::InvalidDataUrl)?;

    let format = header
        .strip_prefix("data:image/")
        .ok_or(ImageError::InvalidDataUrl)?;

    let extension = match format.to_ascii_lowercase().as_str() {
        "png" => "png",
        "jpeg" | "jpg" => "jpg",
        "gif" => "gif",
        "webp" => "webp",
        other => return Err(ImageError::UnsupportedFormat(other.to_string())),
    };

    let bytes = STANDARD.decode(payload.trim())?;
    if bytes.is_empty() {
        return Err(ImageError::Empty);
    }

    Ok((extension, bytes))
}
