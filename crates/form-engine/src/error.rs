use form_types::FormError;
use pdf_layout::LayoutError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("PDF layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Unknown form: {0}")]
    UnknownForm(String),

    #[error("Invalid JSON for {kind}: {message}")]
    InvalidJson { kind: String, message: String },
}

pub type Result<T> = std::result::Result<T, RenderError>;
