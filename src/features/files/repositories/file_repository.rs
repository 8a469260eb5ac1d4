use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::files::models::FileRecord;

/// Durable table of file metadata keyed by id
///
/// Each call is atomic for its record; nothing spans several records.
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Persist a new record and return it as stored
    async fn save(&self, record: FileRecord) -> Result<FileRecord>;

    async fn find_by_id(&self, id: &str) -> Result<Option<FileRecord>>;

    /// Remove `record`, returning `false` when it was already gone
    async fn delete(&self, record: &FileRecord) -> Result<bool>;
}
