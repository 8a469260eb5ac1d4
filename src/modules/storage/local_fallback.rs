use async_trait::async_trait;
use tracing::{debug, warn};

use super::blob_store::{unique_key, BlobStore, StorageError, LOCAL_URL_SCHEME};

/// Blob store that stores nothing and hands out synthetic locations
///
/// Used when no remote backend is configured, and by [`super::RemoteBlobStore`]
/// when the remote upload fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFallbackBlobStore;

impl LocalFallbackBlobStore {
    /// `local://<fresh-uuid>_<file_name>`
    pub fn location_for(file_name: &str) -> String {
        format!("{}{}", LOCAL_URL_SCHEME, unique_key(file_name))
    }
}

#[async_trait]
impl BlobStore for LocalFallbackBlobStore {
    async fn put(
        &self,
        file_name: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        let location = Self::location_for(file_name);
        warn!(
            "No remote blob storage available, {} bytes of '{}' not persisted. Using {}",
            data.len(),
            file_name,
            location
        );
        Ok(location)
    }

    async fn delete(&self, location: &str) -> Result<(), StorageError> {
        debug!("Skipping delete of '{}': nothing stored locally", location);
        Ok(())
    }

    async fn exists(&self, _location: &str) -> Result<bool, StorageError> {
        Ok(false)
    }
}
