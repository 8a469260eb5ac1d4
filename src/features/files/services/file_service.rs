use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::error::{AppError, Result};
use crate::features::files::models::FileRecord;
use crate::features::files::repositories::FileRepository;
use crate::modules::storage::{BlobStore, LocalFallbackBlobStore};

/// Message returned when an upload carries no content
pub const EMPTY_FILE_MESSAGE: &str = "File is empty or not provided";

/// Storage gateway over file metadata and file content
///
/// Blob failures never fail an operation: uploads degrade to a fallback
/// location and blob deletes are best-effort. Metadata failures always
/// propagate.
pub struct FileService {
    repository: Arc<dyn FileRepository>,
    blob_store: Arc<dyn BlobStore>,
}

impl FileService {
    pub fn new(repository: Arc<dyn FileRepository>, blob_store: Arc<dyn BlobStore>) -> Self {
        Self {
            repository,
            blob_store,
        }
    }

    /// Store a file's content and record its metadata
    ///
    /// # Arguments
    /// * `data` - The file content as bytes
    /// * `original_filename` - The client-supplied filename
    /// * `content_type` - The MIME type of the file
    ///
    /// # Returns
    /// The persisted record
    pub async fn upload(
        &self,
        data: Vec<u8>,
        original_filename: &str,
        content_type: &str,
    ) -> Result<FileRecord> {
        if data.is_empty() {
            return Err(AppError::Validation(EMPTY_FILE_MESSAGE.to_string()));
        }

        info!(
            "Attempting to upload file: {} ({} bytes)",
            original_filename,
            data.len()
        );

        // The blob store hands back a fallback location instead of failing
        let url = match self
            .blob_store
            .put(original_filename, data, content_type)
            .await
        {
            Ok(url) => url,
            Err(e) => {
                warn!(
                    "Blob store rejected '{}': {}. Using fallback location",
                    original_filename, e
                );
                LocalFallbackBlobStore::location_for(original_filename)
            }
        };
        debug!("File content stored at: {}", url);

        let file = self
            .repository
            .save(FileRecord::new(original_filename, url))
            .await?;

        info!("File saved with ID: {}", file.id);
        Ok(file)
    }

    /// Look up a file's metadata; `None` when no such file exists
    pub async fn get(&self, id: &str) -> Result<Option<FileRecord>> {
        self.repository.find_by_id(id).await
    }

    /// Delete a file's content (best-effort) and its metadata
    pub async fn delete(&self, id: &str) -> Result<()> {
        let file = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File not found: {}", id)))?;

        if let Err(e) = self.blob_store.delete(&file.url).await {
            warn!(
                "Failed to delete content of file {} at {}: {}",
                file.id, file.url, e
            );
        }

        if !self.repository.delete(&file).await? {
            return Err(AppError::NotFound(format!("File not found: {}", id)));
        }

        info!("File deleted: id={}, url={}", file.id, file.url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::{key_from_url, RemoteBlobStore, LOCAL_URL_SCHEME};
    use crate::shared::test_helpers::{
        FailingBlobStore, FailingFileRepository, InMemoryFileRepository, RecordingBlobStore,
    };
    use fake::faker::filesystem::en::FileName;
    use fake::Fake;
    use std::collections::HashSet;

    fn service_with(blob_store: Arc<dyn BlobStore>) -> (FileService, Arc<InMemoryFileRepository>) {
        let repository = Arc::new(InMemoryFileRepository::default());
        let service = FileService::new(repository.clone(), blob_store);
        (service, repository)
    }

    fn local_service() -> (FileService, Arc<InMemoryFileRepository>) {
        service_with(Arc::new(LocalFallbackBlobStore))
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_payload() {
        let (service, repository) = local_service();

        let result = service.upload(Vec::new(), "empty.txt", "text/plain").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(repository.len(), 0);
    }

    #[tokio::test]
    async fn test_get_returns_uploaded_record() {
        let (service, _) = local_service();
        let name: String = FileName().fake();

        let uploaded = service
            .upload(b"content".to_vec(), &name, "application/octet-stream")
            .await
            .unwrap();
        let fetched = service.get(&uploaded.id).await.unwrap().unwrap();

        assert_eq!(fetched.file_name, uploaded.file_name);
        assert_eq!(fetched.original_file_name, uploaded.original_file_name);
        assert_eq!(fetched.url, uploaded.url);
        assert_eq!(fetched.file_name, name);
        assert_eq!(fetched.original_file_name, name);
    }

    #[tokio::test]
    async fn test_upload_without_remote_returns_local_url() {
        let (service, _) = local_service();

        let record = service
            .upload(vec![7; 16], "photo.png", "image/png")
            .await
            .unwrap();

        let key = record.url.strip_prefix(LOCAL_URL_SCHEME).unwrap();
        let (id, name) = key.split_once('_').unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
        assert_eq!(name, "photo.png");
    }

    #[tokio::test]
    async fn test_upload_degrades_when_remote_fails() {
        let (service, _) = service_with(Arc::new(RemoteBlobStore::new(Arc::new(FailingBlobStore))));

        let record = service
            .upload(vec![1, 2, 3], "report.pdf", "application/pdf")
            .await
            .unwrap();

        assert!(record.url.starts_with(LOCAL_URL_SCHEME));
        assert!(record.url.ends_with("_report.pdf"));
    }

    #[tokio::test]
    async fn test_upload_falls_back_when_blob_store_errors() {
        let (service, repository) = service_with(Arc::new(FailingBlobStore));

        let record = service
            .upload(vec![4, 5, 6], "scan.tiff", "image/tiff")
            .await
            .unwrap();

        assert!(record.url.starts_with(LOCAL_URL_SCHEME));
        assert!(record.url.ends_with("_scan.tiff"));
        assert_eq!(repository.len(), 1);
        let stored = service.get(&record.id).await.unwrap().unwrap();
        assert_eq!(stored.url, record.url);
    }

    #[tokio::test]
    async fn test_upload_propagates_metadata_failure() {
        let service = FileService::new(
            Arc::new(FailingFileRepository),
            Arc::new(LocalFallbackBlobStore),
        );

        let result = service.upload(vec![1], "a.txt", "text/plain").await;

        assert!(matches!(result, Err(AppError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_none() {
        let (service, _) = local_service();
        assert!(service.get("does-not-exist").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_not_found() {
        let (service, _) = local_service();

        let result = service.delete("does-not-exist").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let (service, _) = local_service();
        let record = service.upload(vec![1], "a.txt", "text/plain").await.unwrap();

        service.delete(&record.id).await.unwrap();
        let second = service.delete(&record.id).await;

        assert!(matches!(second, Err(AppError::NotFound(_))));
        assert!(service.get(&record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_blob_and_metadata() {
        let blob_store = Arc::new(RecordingBlobStore::default());
        let (service, repository) = service_with(blob_store.clone());
        let record = service.upload(vec![1], "a.txt", "text/plain").await.unwrap();

        service.delete(&record.id).await.unwrap();

        assert_eq!(blob_store.deleted(), vec![record.url.clone()]);
        assert_eq!(repository.len(), 0);
    }

    #[tokio::test]
    async fn test_delete_survives_blob_failure() {
        let (service, repository) = service_with(Arc::new(FailingBlobStore));
        let record = FileRecord::new("a.txt", "https://bucket.example.com/x_a.txt".to_string());
        repository.insert(record.clone());

        service.delete(&record.id).await.unwrap();

        assert!(service.get(&record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_uploads_get_distinct_ids_and_keys() {
        let (service, _) = local_service();
        let service = Arc::new(service);

        let uploads = (0..32).map(|_| {
            let service = Arc::clone(&service);
            async move {
                service
                    .upload(b"same".to_vec(), "same.png", "image/png")
                    .await
                    .unwrap()
            }
        });
        let records = futures::future::join_all(uploads).await;

        let ids: HashSet<_> = records.iter().map(|r| r.id.clone()).collect();
        let keys: HashSet<_> = records
            .iter()
            .map(|r| key_from_url(&r.url))
            .collect();
        assert_eq!(ids.len(), 32);
        assert_eq!(keys.len(), 32);
    }

    #[tokio::test]
    async fn test_concurrent_deletes_have_one_winner() {
        let (service, _) = local_service();
        let service = Arc::new(service);
        let record = service.upload(vec![1], "a.txt", "text/plain").await.unwrap();

        let deletes = (0..8).map(|_| {
            let service = Arc::clone(&service);
            let id = record.id.clone();
            tokio::spawn(async move { service.delete(&id).await })
        });
        let results = futures::future::join_all(deletes).await;

        let succeeded = results
            .iter()
            .filter(|r| matches!(r, Ok(Ok(()))))
            .count();
        let not_found = results
            .iter()
            .filter(|r| matches!(r, Ok(Err(AppError::NotFound(_)))))
            .count();
        assert_eq!(succeeded, 1);
        assert_eq!(not_found, 7);
    }
}
