mod file_repository;
mod instrumented;
mod pg_file_repository;

pub use file_repository::FileRepository;
pub use instrumented::InstrumentedFileRepository;
pub use pg_file_repository::PgFileRepository;
