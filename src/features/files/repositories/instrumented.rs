use async_trait::async_trait;

use super::file_repository::FileRepository;
use crate::core::error::Result;
use crate::core::instrumentation::{Boundary, Interceptor, OperationLabel};
use crate::features::files::models::FileRecord;

/// Records timing and error telemetry for every call into `R`
pub struct InstrumentedFileRepository<R> {
    inner: R,
    interceptor: Interceptor,
    save_label: OperationLabel,
    find_by_id_label: OperationLabel,
    delete_label: OperationLabel,
}

impl<R: FileRepository> InstrumentedFileRepository<R> {
    pub fn new(inner: R, interceptor: Interceptor) -> Self {
        Self {
            inner,
            interceptor,
            save_label: OperationLabel::for_type::<R>(Boundary::Database, "save"),
            find_by_id_label: OperationLabel::for_type::<R>(Boundary::Database, "find_by_id"),
            delete_label: OperationLabel::for_type::<R>(Boundary::Database, "delete"),
        }
    }
}

#[async_trait]
impl<R: FileRepository> FileRepository for InstrumentedFileRepository<R> {
    async fn save(&self, record: FileRecord) -> Result<FileRecord> {
        self.interceptor
            .intercept(&self.save_label, || self.inner.save(record))
            .await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<FileRecord>> {
        self.interceptor
            .intercept(&self.find_by_id_label, || self.inner.find_by_id(id))
            .await
    }

    async fn delete(&self, record: &FileRecord) -> Result<bool> {
        self.interceptor
            .intercept(&self.delete_label, || self.inner.delete(record))
            .await
    }
}
