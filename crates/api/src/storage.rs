//! Blob storage for uploaded images.
//!
//! Uploads follow a two-phase protocol: the blob is written first, and the
//! database row only after the write succeeds. Deletion runs in the opposite
//! order: the blob is removed first and the row is kept when removal fails,
//! so a dangling row always points at an existing blob rather than the other
//! way around.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::ImageFormat;
use uuid::Uuid;

use memoria_core::error::CoreError;
use memoria_core::types::DbId;

/// Abstract blob store keyed by slash-separated relative paths.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write a blob under `key`, overwriting any existing object.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), CoreError>;

    /// Remove the blob under `key`. Removing a missing object is an error;
    /// callers that treat cleanup as best-effort log and continue.
    async fn remove(&self, key: &str) -> Result<(), CoreError>;
}

/// Filesystem-backed store rooted at a single directory, served publicly
/// via a static-file route.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, CoreError> {
        if key.is_empty()
            || key.starts_with('/')
            || key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..")
        {
            return Err(CoreError::Storage(format!("Invalid object key '{key}'")));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), CoreError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::Storage(format!("Failed to create '{key}' dir: {e}")))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to write '{key}': {e}")))
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        let path = self.resolve(key)?;
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to remove '{key}': {e}")))
    }
}

// ---------------------------------------------------------------------------
// Keys and URLs
// ---------------------------------------------------------------------------

/// Storage key for a memorial image blob.
pub fn memorial_image_key(memorial_id: DbId, ext: &str) -> String {
    format!("memorials/{memorial_id}/{}.{ext}", Uuid::new_v4().simple())
}

/// Storage key for a user avatar blob.
pub fn avatar_key(user_id: DbId, ext: &str) -> String {
    format!("avatars/{user_id}/{}.{ext}", Uuid::new_v4().simple())
}

/// Public URL for a stored object.
pub fn public_url(base: &str, key: &str) -> String {
    format!("{}/{key}", base.trim_end_matches('/'))
}

/// Recover the storage key from a public URL, if the URL lives under `base`.
///
/// Returns `None` for external URLs (e.g. the legacy single-URL field may
/// point anywhere); those have no blob to delete.
pub fn key_from_url(url: &str, base: &str) -> Option<String> {
    let base = base.trim_end_matches('/');
    let rest = url.strip_prefix(base)?.strip_prefix('/')?;
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

/// Determine the file extension for an uploaded image by sniffing its magic
/// bytes. Only formats the service can serve are accepted.
pub fn sniff_extension(bytes: &[u8]) -> Result<&'static str, CoreError> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => Ok("png"),
        Ok(ImageFormat::Jpeg) => Ok("jpg"),
        Ok(ImageFormat::WebP) => Ok("webp"),
        Ok(other) => Err(CoreError::Validation(format!(
            "Unsupported image format: {other:?}. Use PNG, JPEG, or WebP"
        ))),
        Err(_) => Err(CoreError::Validation(
            "Uploaded file is not a recognized image".into(),
        )),
    }
}
