//! In-memory record store

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Collection, Record, RecordStore};
use crate::error::AppResult;

/// Keeps a collection in process memory. Used for tests and ephemeral runs.
pub struct MemoryStore<T: Record> {
    inner: RwLock<Collection<T>>,
}

impl<T: Record> MemoryStore<T> {
    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            inner: RwLock::new(Collection::new(records, None)),
        }
    }
}

impl<T: Record> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::with_records(Vec::new())
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for MemoryStore<T> {
    async fn load(&self) -> AppResult<Collection<T>> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, collection: &Collection<T>) -> AppResult<()> {
        *self.inner.write().await = collection.clone();
        Ok(())
    }
}
