mod file_service;

pub use file_service::{FileService, EMPTY_FILE_MESSAGE};
