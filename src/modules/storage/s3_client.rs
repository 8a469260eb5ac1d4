//! S3-compatible storage client
//!
//! Uploads under uniquified keys and returns the public location of each
//! object. Works against AWS S3 or any S3-compatible service (MinIO) through
//! the rust-s3 crate. Errors are reported as-is; degrading on failure is
//! [`super::RemoteBlobStore`]'s job.

use async_trait::async_trait;
use reqwest::Url;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tracing::{debug, info};

use super::blob_store::{key_from_url, unique_key, BlobStore, StorageError};
use crate::core::config::StorageConfig;

pub struct S3Client {
    bucket: Box<Bucket>,
    /// Base of every returned location, without trailing slash
    base_url: String,
    /// Path prefix of `base_url` (e.g. `bucket/` for path-style endpoints)
    key_prefix: String,
}

impl S3Client {
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let bucket_name = config
            .bucket
            .as_deref()
            .ok_or_else(|| StorageError::Configuration("S3_BUCKET is not set".to_string()))?;

        let credentials = match (&config.access_key, &config.secret_key) {
            (Some(access_key), Some(secret_key)) => Credentials::new(
                Some(access_key.as_str()),
                Some(secret_key.as_str()),
                None,
                None,
                None,
            ),
            _ => Credentials::default(),
        }
        .map_err(|e| {
            StorageError::Configuration(format!("Failed to create S3 credentials: {}", e))
        })?;

        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config.region.parse::<Region>().map_err(|e| {
                StorageError::Configuration(format!("Invalid region '{}': {}", config.region, e))
            })?,
        };

        let mut bucket = Bucket::new(bucket_name, region, credentials).map_err(|e| {
            StorageError::Configuration(format!("Failed to create S3 bucket handle: {}", e))
        })?;

        // Custom endpoints (MinIO) are addressed as http://endpoint/bucket
        if config.endpoint.is_some() {
            bucket.set_path_style();
        }

        let base_url = config.base_url(bucket_name);
        let key_prefix = Self::path_prefix(&base_url);

        info!(
            "S3 client initialized for bucket: {}, base url: {}",
            bucket_name, base_url
        );

        Ok(Self {
            bucket,
            base_url,
            key_prefix,
        })
    }

    /// Non-empty path of `base_url` with a trailing `/`, or an empty string
    fn path_prefix(base_url: &str) -> String {
        Url::parse(base_url)
            .ok()
            .map(|url| url.path().trim_matches('/').to_string())
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}/", path))
            .unwrap_or_default()
    }

    /// Public location of `key`
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(key))
    }

    /// Store key referenced by `location`
    pub fn key_for(&self, location: &str) -> String {
        let key = key_from_url(location);
        match key.strip_prefix(&self.key_prefix) {
            Some(stripped) if !self.key_prefix.is_empty() => stripped.to_string(),
            _ => key,
        }
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }

    fn check_status(operation: &str, key: &str, status: u16) -> Result<(), StorageError> {
        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(StorageError::Backend(format!(
                "{} of '{}' returned status {}",
                operation, key, status
            )))
        }
    }
}

#[async_trait]
impl BlobStore for S3Client {
    async fn put(
        &self,
        file_name: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let key = unique_key(file_name);

        let response = self
            .bucket
            .put_object_with_content_type(&key, &data, content_type)
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to upload '{}': {}", key, e)))?;
        Self::check_status("Upload", &key, response.status_code())?;

        debug!(
            "Uploaded '{}' ({} bytes) to bucket '{}'",
            key,
            data.len(),
            self.bucket.name()
        );
        Ok(self.object_url(&key))
    }

    async fn delete(&self, location: &str) -> Result<(), StorageError> {
        let key = self.key_for(location);
        info!("About to delete S3 object with key: {}", key);

        let response = self
            .bucket
            .delete_object(&key)
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to delete '{}': {}", key, e)))?;
        Self::check_status("Delete", &key, response.status_code())?;

        debug!("Deleted '{}' from bucket '{}'", key, self.bucket.name());
        Ok(())
    }

    async fn exists(&self, location: &str) -> Result<bool, StorageError> {
        let key = self.key_for(location);

        match self.bucket.head_object(&key).await {
            Ok((_, 404)) => Ok(false),
            Ok((_, status)) => Self::check_status("Head", &key, status).map(|_| true),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("404") || error_str.contains("NoSuchKey") {
                    Ok(false)
                } else {
                    Err(StorageError::Backend(format!(
                        "Failed to check if '{}' exists: {}",
                        key, e
                    )))
                }
            }
        }
    }
}
