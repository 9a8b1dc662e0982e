//! Row sources: a single CSV export, or a ZIP archive of them.

pub mod archive;
pub mod csv_rows;

use thiserror::Error;

pub use archive::{CsvArchive, CsvEntry};
pub use csv_rows::{read_csv_file, read_rows};

/// Input that cannot be read at all. Aborts the run.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
