use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::error::Result;
use crate::core::instrumentation::Interceptor;
use crate::core::metrics::Metrics;
use crate::features::files::models::FileRecord;
use crate::features::files::repositories::FileRepository;
use crate::modules::storage::{unique_key, BlobStore, StorageError};

pub fn test_interceptor() -> Interceptor {
    Interceptor::new(Arc::new(Metrics::new("test").unwrap()))
}

/// Repository keeping records in a map; removal is atomic per record
#[derive(Default)]
pub struct InMemoryFileRepository {
    records: Mutex<HashMap<String, FileRecord>>,
}

impl InMemoryFileRepository {
    pub fn insert(&self, record: FileRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.id.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn save(&self, record: FileRecord) -> Result<FileRecord> {
        self.insert(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<FileRecord>> {
        Ok(self.records.lock().unwrap().get(id).cloned())
    }

    async fn delete(&self, record: &FileRecord) -> Result<bool> {
        Ok(self.records.lock().unwrap().remove(&record.id).is_some())
    }
}

/// Repository whose every call fails like an unreachable database
pub struct FailingFileRepository;

#[async_trait]
impl FileRepository for FailingFileRepository {
    async fn save(&self, _record: FileRecord) -> Result<FileRecord> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<FileRecord>> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn delete(&self, _record: &FileRecord) -> Result<bool> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
}

/// Blob store whose every call fails like an unreachable backend
pub struct FailingBlobStore;

#[async_trait]
impl BlobStore for FailingBlobStore {
    async fn put(
        &self,
        _file_name: &str,
        _data: Vec<u8>,
        _content_type: &str,
    ) -> std::result::Result<String, StorageError> {
        Err(StorageError::Backend("connection refused".to_string()))
    }

    async fn delete(&self, _location: &str) -> std::result::Result<(), StorageError> {
        Err(StorageError::Backend("connection refused".to_string()))
    }

    async fn exists(&self, _location: &str) -> std::result::Result<bool, StorageError> {
        Err(StorageError::Backend("connection refused".to_string()))
    }
}

/// Remote-looking blob store that remembers what was stored and deleted
#[derive(Default)]
pub struct RecordingBlobStore {
    stored: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
}

impl RecordingBlobStore {
    pub fn stored(&self) -> Vec<String> {
        self.stored.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for RecordingBlobStore {
    async fn put(
        &self,
        file_name: &str,
        _data: Vec<u8>,
        _content_type: &str,
    ) -> std::result::Result<String, StorageError> {
        let location = format!("https://bucket.example.com/{}", unique_key(file_name));
        self.stored.lock().unwrap().push(location.clone());
        Ok(location)
    }

    async fn delete(&self, location: &str) -> std::result::Result<(), StorageError> {
        self.deleted.lock().unwrap().push(location.to_string());
        Ok(())
    }

    async fn exists(&self, location: &str) -> std::result::Result<bool, StorageError> {
        let stored = self.stored.lock().unwrap().iter().any(|l| l == location);
        let deleted = self.deleted.lock().unwrap().iter().any(|l| l == location);
        Ok(stored && !deleted)
    }
}
