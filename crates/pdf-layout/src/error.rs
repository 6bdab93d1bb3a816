use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    #[error("Image {0} was not registered on this canvas")]
    UnknownImage(usize),

    #[error("Failed to encode page content: {0}")]
    ContentEncode(String),

    #[error("Failed to write PDF: {0}")]
    Save(String),
}
