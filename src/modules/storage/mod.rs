//! Storage module for file content
//!
//! Provides the [`BlobStore`] capability with an S3-compatible client, a
//! local fallback that stores nothing, and the degrade-not-fail wrapper
//! selected when a remote bucket is configured.

mod blob_store;
mod instrumented;
mod local_fallback;
mod remote;
mod s3_client;

use std::sync::Arc;

use tracing::{info, warn};

pub use blob_store::{BlobStore, StorageError};
pub use instrumented::InstrumentedBlobStore;
pub use local_fallback::LocalFallbackBlobStore;
pub use remote::RemoteBlobStore;
pub use s3_client::S3Client;

#[cfg(test)]
pub use blob_store::{key_from_url, unique_key, LOCAL_URL_SCHEME};

use crate::core::config::StorageConfig;
use crate::core::instrumentation::Interceptor;

/// Build the blob store for `config`
///
/// With a bucket configured this is the instrumented S3 client behind a
/// [`RemoteBlobStore`]; otherwise the instrumented local fallback.
pub fn build_blob_store(
    config: &StorageConfig,
    interceptor: &Interceptor,
) -> Result<Arc<dyn BlobStore>, StorageError> {
    if !config.is_remote_configured() {
        warn!("No S3 bucket configured. Uploads will receive local fallback URLs");
        return Ok(Arc::new(InstrumentedBlobStore::new(
            LocalFallbackBlobStore,
            interceptor.clone(),
        )));
    }

    let client = S3Client::new(config)?;
    info!("Remote blob storage enabled for bucket: {}", client.bucket_name());

    let backend = InstrumentedBlobStore::new(client, interceptor.clone());
    Ok(Arc::new(RemoteBlobStore::new(Arc::new(backend))))
}
