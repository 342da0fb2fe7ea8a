#[derive(thiserror::Error, Debug)]
pub enum ArtworkError {
    #[error("Could not decode image")]
    ImageDecode(#[from] image::ImageError),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Palette has {actual} colors, but at least {required} are required")]
    InsufficientPalette { required: usize, actual: usize },
    #[error("Artwork task failed: {0}")]
    Task(String),
}

impl From<std::io::Error> for ArtworkError {
    fn from(e: std::io::Error) -> Self {
        ArtworkError::ImageDecode(image::ImageError::IoError(e))
    }
}

pub(crate) fn invalid_parameter(msg: impl Into<String>) -> ArtworkError {
    ArtworkError::InvalidParameter(msg.into())
}
