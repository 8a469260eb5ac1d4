use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::file_repository::FileRepository;
use crate::core::error::Result;
use crate::features::files::models::FileRecord;

/// [`FileRepository`] backed by the `files` table in Postgres
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn save(&self, record: FileRecord) -> Result<FileRecord> {
        let file = sqlx::query_as::<_, FileRecord>(
            r#"
            INSERT INTO files (id, file_name, original_file_name, url, upload_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, file_name, original_file_name, url, upload_date
            "#,
        )
        .bind(&record.id)
        .bind(&record.file_name)
        .bind(&record.original_file_name)
        .bind(&record.url)
        .bind(record.upload_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(file)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<FileRecord>> {
        let file = sqlx::query_as::<_, FileRecord>(
            r#"
            SELECT id, file_name, original_file_name, url, upload_date
            FROM files
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(file)
    }

    async fn delete(&self, record: &FileRecord) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM files
            WHERE id = $1
            "#,
        )
        .bind(&record.id)
        .execute(&self.pool)
        .await?;

        debug!(
            "Deleted file metadata: id={}, rows={}",
            record.id,
            result.rows_affected()
        );
        Ok(result.rows_affected() > 0)
    }
}
