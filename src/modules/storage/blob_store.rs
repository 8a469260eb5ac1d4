//! Blob store capability and storage key helpers

use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Scheme of synthetic locations produced when nothing was stored remotely
pub const LOCAL_URL_SCHEME: &str = "local://";

/// Failure reported by a blob backend
///
/// Never leaves the storage layer: the degrading stores turn it into a
/// fallback URL or a logged warning.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage configuration: {0}")]
    Configuration(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Put, delete and existence checks over stored file content
///
/// Locations returned by [`BlobStore::put`] are the only handle callers keep;
/// `delete` and `exists` derive the backend key from them.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under a key derived from `file_name` and return its location
    async fn put(
        &self,
        file_name: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;

    async fn delete(&self, location: &str) -> Result<(), StorageError>;

    async fn exists(&self, location: &str) -> Result<bool, StorageError>;
}

/// `<fresh-uuid>_<file_name>`, unique across concurrent uploads of one name
pub fn unique_key(file_name: &str) -> String {
    format!("{}_{}", Uuid::new_v4(), file_name)
}

/// Derive the store key from a location URL
///
/// Uses the URL path without its leading `/`. Strings that do not parse as a
/// URL, or parse without a path, fall back to the text after the last `/`.
pub fn key_from_url(location: &str) -> String {
    match Url::parse(location) {
        Ok(url) => {
            let path = url.path();
            let path = path.strip_prefix('/').unwrap_or(path);
            if path.is_empty() {
                return last_segment(location).to_string();
            }

            debug!("Extracted path from URL: {}", path);
            urlencoding::decode(path)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| path.to_string())
        }
        Err(e) => {
            debug!(
                "Failed to parse URL '{}': {}. Using last path segment",
                location, e
            );
            last_segment(location).to_string()
        }
    }
}

fn last_segment(location: &str) -> &str {
    location.rsplit('/').next().unwrap_or(location)
}
