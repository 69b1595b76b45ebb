use thiserror::Error;

/// Errors raised when a caller checks an [`crate::ImageRecord`] against [`crate::ImageLimits`].
#[derive(Debug, Error, PartialEq)]
pub enum ImageDataError {
    #[error("image data is {len} bytes, limit is {max} bytes")]
    PayloadTooLarge { len: usize, max: usize },
    #[error("image data is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
}
