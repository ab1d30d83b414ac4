//! JSON document store: one file holding an array of records

use std::{marker::PhantomData, path::PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use super::{Collection, Record, RecordStore};
use crate::error::{AppError, AppResult};

/// Sidecar document carrying the identifier counter
#[derive(Debug, Serialize, Deserialize)]
struct StoreMeta {
    next_id: i64,
}

/// Record store persisted as a pretty-printed JSON array.
///
/// The identifier counter lives next to the document in `<stem>.meta.json`.
/// A missing document is an empty collection.
pub struct JsonFileStore<T> {
    path: PathBuf,
    meta_path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store".to_string());
        let meta_path = path.with_file_name(format!("{}.meta.json", stem));
        Self {
            path,
            meta_path,
            _marker: PhantomData,
        }
    }
}

async fn read_optional(path: &PathBuf) -> AppResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) if content.trim().is_empty() => Ok(None),
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::Storage(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Serialize with four-space indentation
fn to_pretty_json<V: Serialize + ?Sized>(value: &V) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Replace `path` with `bytes` via a temporary sibling file
async fn write_replace(path: &PathBuf, bytes: Vec<u8>) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", tmp.display(), e)))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to replace {}: {}", path.display(), e)))?;
    Ok(())
}

#[async_trait]
impl<T: Record> RecordStore<T> for JsonFileStore<T> {
    async fn load(&self) -> AppResult<Collection<T>> {
        let records: Vec<T> = match read_optional(&self.path).await? {
            Some(content) => serde_json::from_str(&content).map_err(|e| {
                AppError::Storage(format!("Invalid JSON in {}: {}", self.path.display(), e))
            })?,
            None => Vec::new(),
        };

        let next_id = match read_optional(&self.meta_path).await? {
            Some(content) => match serde_json::from_str::<StoreMeta>(&content) {
                Ok(meta) => Some(meta.next_id),
                Err(e) => {
                    tracing::warn!(
                        "Ignoring unreadable counter {}: {}",
                        self.meta_path.display(),
                        e
                    );
                    None
                }
            },
            None => None,
        };

        Ok(Collection::new(records, next_id))
    }

    async fn save(&self, collection: &Collection<T>) -> AppResult<()> {
        write_replace(&self.path, to_pretty_json(&collection.records)?).await?;
        let meta = StoreMeta {
            next_id: collection.next_id(),
        };
        write_replace(&self.meta_path, to_pretty_json(&meta)?).await?;
        tracing::debug!(
            "Saved {} records to {}",
            collection.records.len(),
            self.path.display()
        );
        Ok(())
    }
}
