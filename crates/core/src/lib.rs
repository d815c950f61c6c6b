//! Core domain types, errors, and plain text formatting
//! for DOCX text extraction.

pub mod error;
pub mod format;
pub mod types;

pub use error::{Error, Result};
pub use format::PlainTextFormatter;
pub use types::ExtractedText;
