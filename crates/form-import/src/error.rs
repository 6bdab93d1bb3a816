use thiserror::Error;

/// Errors raised while reading an uploaded file
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Could not extract text from PDF: {0}")]
    Pdf(String),

    #[error("Could not read DOCX: {0}")]
    Docx(String),

    #[error("The uploaded file is empty")]
    Empty,
}

pub type Result<T> = std::result::Result<T, ImportError>;
