//! Errors raised while encoding or writing documents. These are fatal for a run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("XML encoding failed: {0}")]
    Xml(String),
    #[error("KMZ archive failed: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("document is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
