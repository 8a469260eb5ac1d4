use async_trait::async_trait;

use super::blob_store::{BlobStore, StorageError};
use crate::core::instrumentation::{Boundary, Interceptor, OperationLabel};

/// Records timing and error telemetry for every call into `B`
pub struct InstrumentedBlobStore<B> {
    inner: B,
    interceptor: Interceptor,
    put_label: OperationLabel,
    delete_label: OperationLabel,
    exists_label: OperationLabel,
}

impl<B: BlobStore> InstrumentedBlobStore<B> {
    pub fn new(inner: B, interceptor: Interceptor) -> Self {
        Self {
            inner,
            interceptor,
            put_label: OperationLabel::for_type::<B>(Boundary::Storage, "put"),
            delete_label: OperationLabel::for_type::<B>(Boundary::Storage, "delete"),
            exists_label: OperationLabel::for_type::<B>(Boundary::Storage, "exists"),
        }
    }
}

#[async_trait]
impl<B: BlobStore> BlobStore for InstrumentedBlobStore<B> {
    async fn put(
        &self,
        file_name: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.interceptor
            .intercept(&self.put_label, || {
                self.inner.put(file_name, data, content_type)
            })
            .await
    }

    async fn delete(&self, location: &str) -> Result<(), StorageError> {
        self.interceptor
            .intercept(&self.delete_label, || self.inner.delete(location))
            .await
    }

    async fn exists(&self, location: &str) -> Result<bool, StorageError> {
        self.interceptor
            .intercept(&self.exists_label, || self.inner.exists(location))
            .await
    }
}
