//! Error types for DOCX text extraction.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during DOCX text extraction.
///
/// Callers treat every variant as the same failure; the variants only
/// shape the message.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read the input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The input is not a readable ZIP archive, or an entry could not be read.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// A required part is absent from the archive.
    #[error("Missing part '{0}' in archive")]
    MissingPart(String),

    /// The document part is not well-formed XML.
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// The document part is not valid UTF-8.
    #[error("Encoding error: {0}")]
    EncodingError(String),
}
