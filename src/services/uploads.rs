//! Upload storage for item images and claim proofs

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{
    config::UploadsConfig,
    error::{AppError, AppResult},
    models::datetime::FILENAME_STAMP_FORMAT,
};

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").unwrap());

/// A file part received from a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client supplied filename, untrusted
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct UploadService {
    dir: PathBuf,
    allowed_extensions: Arc<Vec<String>>,
}

impl UploadService {
    pub fn new(config: &UploadsConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            allowed_extensions: Arc::new(
                config
                    .allowed_extensions
                    .iter()
                    .map(|e| e.trim_start_matches('.').to_lowercase())
                    .collect(),
            ),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if needed
    pub async fn ensure_dir(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Upload(format!("Failed to create {}: {}", self.dir.display(), e))
        })
    }

    /// Whether the extension after the last dot is on the allow-list
    pub fn is_allowed(&self, file_name: &str) -> bool {
        match file_name.rsplit_once('.') {
            Some((_, ext)) => self.allowed_extensions.contains(&ext.to_lowercase()),
            None => false,
        }
    }

    /// Write an upload under a unique name.
    ///
    /// Returns `None` when the file is not an allowed image; such uploads are ignored.
    pub async fn store(&self, upload: &UploadedFile, now: NaiveDateTime) -> AppResult<Option<String>> {
        if !self.is_allowed(&upload.file_name) {
            tracing::debug!("Ignoring upload with disallowed name {:?}", upload.file_name);
            return Ok(None);
        }

        let safe = secure_filename(&upload.file_name);
        if !self.is_allowed(&safe) {
            tracing::debug!("Ignoring upload {:?}: nothing usable after sanitizing", upload.file_name);
            return Ok(None);
        }

        let stored = unique_name(&safe, now);
        let path = self.dir.join(&stored);
        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| AppError::Upload(format!("Failed to write {}: {}", path.display(), e)))?;

        tracing::info!("Stored upload {} ({} bytes)", stored, upload.bytes.len());
        Ok(Some(stored))
    }

    /// Delete a stored upload that no record refers to
    pub async fn discard(&self, stored: &str) {
        let path = self.dir.join(stored);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!("Discarded upload {}", stored),
            Err(e) => tracing::warn!("Failed to discard {}: {}", path.display(), e),
        }
    }
}

/// `<timestamp>_<8 hex>_<name>` so that uploads never overwrite each other
fn unique_name(safe: &str, now: NaiveDateTime) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}", now.format(FILENAME_STAMP_FORMAT), &suffix[..8], safe)
}

/// Reduce a client filename to a flat ASCII name safe to join onto a directory
pub fn secure_filename(name: &str) -> String {
    let ascii: String = name.nfkd().filter(|c| c.is_ascii()).collect();
    let flat = ascii.replace(['/', '\\'], " ");
    let joined = flat.split_whitespace().collect::<Vec<_>>().join("_");
    UNSAFE_CHARS
        .replace_all(&joined, "")
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}
