use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use super::blob_store::{BlobStore, StorageError, LOCAL_URL_SCHEME};
use super::local_fallback::LocalFallbackBlobStore;

/// Remote blob store that degrades instead of failing
///
/// A failed upload yields a fallback `local://` location for the same file,
/// a failed delete is logged and ignored. `put` and `delete` never return
/// `Err`; `exists` reports backend errors as they are.
pub struct RemoteBlobStore {
    backend: Arc<dyn BlobStore>,
}

impl RemoteBlobStore {
    pub fn new(backend: Arc<dyn BlobStore>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl BlobStore for RemoteBlobStore {
    async fn put(
        &self,
        file_name: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        match self.backend.put(file_name, data, content_type).await {
            Ok(location) => Ok(location),
            Err(e) => {
                let location = LocalFallbackBlobStore::location_for(file_name);
                error!(
                    "Error uploading '{}' to remote storage: {}. Using fallback location {}",
                    file_name, e, location
                );
                Ok(location)
            }
        }
    }

    async fn delete(&self, location: &str) -> Result<(), StorageError> {
        if location.starts_with(LOCAL_URL_SCHEME) {
            debug!("Skipping remote delete of fallback location '{}'", location);
            return Ok(());
        }

        if let Err(e) = self.backend.delete(location).await {
            error!("Error in remote deletion of '{}': {}", location, e);
            return Ok(());
        }

        match self.backend.exists(location).await {
            Ok(still_exists) => info!(
                "Object '{}' still exists after deletion? {}",
                location, still_exists
            ),
            Err(e) => warn!("Could not verify deletion of '{}': {}", location, e),
        }

        Ok(())
    }

    async fn exists(&self, location: &str) -> Result<bool, StorageError> {
        if location.starts_with(LOCAL_URL_SCHEME) {
            return Ok(false);
        }

        self.backend.exists(location).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{FailingBlobStore, RecordingBlobStore};

    #[tokio::test]
    async fn test_put_failure_degrades_to_fallback_location() {
        let store = RemoteBlobStore::new(Arc::new(FailingBlobStore));

        let location = store
            .put("photo.png", vec![0xFF; 8], "image/png")
            .await
            .unwrap();

        assert!(location.starts_with(LOCAL_URL_SCHEME));
        assert!(location.ends_with("_photo.png"));
    }

    #[tokio::test]
    async fn test_put_success_returns_backend_location() {
        let backend = Arc::new(RecordingBlobStore::default());
        let store = RemoteBlobStore::new(backend.clone());

        let location = store.put("photo.png", vec![1], "image/png").await.unwrap();

        assert!(location.starts_with("https://bucket.example.com/"));
        assert_eq!(backend.stored(), vec![location]);
    }

    #[tokio::test]
    async fn test_delete_failure_is_swallowed() {
        let store = RemoteBlobStore::new(Arc::new(FailingBlobStore));

        let result = store
            .delete("https://bucket.example.com/abc123_photo.png")
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_skips_backend_for_fallback_locations() {
        let backend = Arc::new(RecordingBlobStore::default());
        let store = RemoteBlobStore::new(backend.clone());

        store.delete("local://abc123_photo.png").await.unwrap();

        assert!(backend.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_from_backend() {
        let backend = Arc::new(RecordingBlobStore::default());
        let store = RemoteBlobStore::new(backend.clone());
        let location = store.put("a.txt", b"hi".to_vec(), "text/plain").await.unwrap();

        store.delete(&location).await.unwrap();

        assert_eq!(backend.deleted(), vec![location.clone()]);
        assert!(!store.exists(&location).await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_reports_backend_errors() {
        let store = RemoteBlobStore::new(Arc::new(FailingBlobStore));

        let result = store
            .exists("https://bucket.example.com/abc123_photo.png")
            .await;

        assert!(matches!(result, Err(StorageError::Backend(_))));
        assert!(!store.exists("local://abc123_photo.png").await.unwrap());
    }
}
