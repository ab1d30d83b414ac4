//! Repository layer: flat record collections persisted as whole documents

pub mod json_file;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use crate::{
    config::StorageConfig,
    error::AppResult,
    models::{Item, Staff, User},
};

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// A persisted record addressed by a numeric identifier
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    fn id(&self) -> i64;
}

/// In-memory image of one store: all records plus the identifier counter
#[derive(Debug, Clone)]
pub struct Collection<T> {
    pub records: Vec<T>,
    next_id: i64,
}

impl<T: Record> Collection<T> {
    /// Build a collection, never letting the counter fall at or below an existing id
    pub fn new(records: Vec<T>, next_id: Option<i64>) -> Self {
        let floor = records.iter().map(Record::id).max().unwrap_or(0) + 1;
        let next_id = next_id.map_or(floor, |n| n.max(floor));
        Self { records, next_id }
    }

    pub fn next_id(&self) -> i64 {
        self.next_id
    }

    /// Hand out the next identifier. Identifiers are never reused.
    pub fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn find(&self, id: i64) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn find_mut(&mut self, id: i64) -> Option<&mut T> {
        self.records.iter_mut().find(|r| r.id() == id)
    }

    /// Remove every record with this id, returning how many were dropped
    pub fn remove(&mut self, id: i64) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        before - self.records.len()
    }
}

impl<T: Record> Default for Collection<T> {
    fn default() -> Self {
        Self::new(Vec::new(), None)
    }
}

/// Storage backend for one collection, loaded and saved wholesale
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    async fn load(&self) -> AppResult<Collection<T>>;
    async fn save(&self, collection: &Collection<T>) -> AppResult<()>;
}

/// A store handle that serializes read-modify-write cycles on its backend
pub struct Store<T: Record> {
    backend: Arc<dyn RecordStore<T>>,
    lock: Arc<Mutex<()>>,
}

impl<T: Record> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            lock: self.lock.clone(),
        }
    }
}

impl<T: Record> Store<T> {
    pub fn new(backend: impl RecordStore<T> + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Load every record
    pub async fn all(&self) -> AppResult<Vec<T>> {
        let _guard = self.lock.lock().await;
        Ok(self.backend.load().await?.records)
    }

    /// Load one record by id
    pub async fn get(&self, id: i64) -> AppResult<Option<T>> {
        let _guard = self.lock.lock().await;
        Ok(self.backend.load().await?.find(id).cloned())
    }

    /// Run `f` on the loaded collection and persist the result.
    ///
    /// Nothing is written when `f` fails.
    pub async fn modify<R, F>(&self, f: F) -> AppResult<R>
    where
        F: FnOnce(&mut Collection<T>) -> AppResult<R> + Send,
        R: Send,
    {
        let _guard = self.lock.lock().await;
        let mut collection = self.backend.load().await?;
        let result = f(&mut collection)?;
        self.backend.save(&collection).await?;
        Ok(result)
    }
}

/// Main repository struct holding one store per entity
#[derive(Clone)]
pub struct Repository {
    pub items: Store<Item>,
    pub staff: Store<Staff>,
    pub users: Store<User>,
}

impl Repository {
    /// Repository backed by the JSON documents named in the storage config
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            items: Store::new(JsonFileStore::new(storage.items_path())),
            staff: Store::new(JsonFileStore::new(storage.staff_path())),
            users: Store::new(JsonFileStore::new(storage.users_path())),
        }
    }

    /// Repository kept entirely in memory, seeded with `users`
    pub fn in_memory(users: Vec<User>) -> Self {
        Self {
            items: Store::new(MemoryStore::default()),
            staff: Store::new(MemoryStore::default()),
            users: Store::new(MemoryStore::with_records(users)),
        }
    }
}
