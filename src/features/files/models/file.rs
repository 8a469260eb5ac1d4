use chrono::{Local, NaiveDate};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata of one uploaded file
///
/// Created once by an upload and deleted as a whole; never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct FileRecord {
    pub id: String,
    pub file_name: String,
    pub original_file_name: String,
    pub url: String,
    pub upload_date: NaiveDate,
}

impl FileRecord {
    /// New record with a fresh id, dated today
    pub fn new(original_file_name: &str, url: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            file_name: original_file_name.to_string(),
            original_file_name: original_file_name.to_string(),
            url,
            upload_date: Local::now().date_naive(),
        }
    }
}
