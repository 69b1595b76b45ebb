use base64::prelude::*;
use serde::{Deserialize, Serialize};

/// A captured image, carried as a base64-encoded PNG.
///
/// The encoded string should not exceed 10MB (see [`crate::MAX_IMAGE_DATA_BYTES`]).
/// The bound is not checked here; callers that need it enforced go through
/// [`crate::ImageLimits`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(rename = "ImageData")]
    image_data: String,
}

impl ImageRecord {
    pub fn new(image_data: impl Into<String>) -> Self {
        Self {
            image_data: image_data.into(),
        }
    }

    /// Encodes raw PNG bytes with the standard base64 alphabet.
    ///
    /// The bytes are not inspected, so anything passed in is accepted.
    pub fn from_png_bytes(bytes: &[u8]) -> Self {
        Self::new(BASE64_STANDARD.encode(bytes))
    }

    pub fn image_data(&self) -> &str {
        &self.image_data
    }

    pub fn into_image_data(self) -> String {
        self.image_data
    }

    /// Length of the encoded string in bytes.
    pub fn encoded_len(&self) -> usize {
        self.image_data.len()
    }
}

impl From<String> for ImageRecord {
    fn from(image_data: String) -> Self {
        Self::new(image_data)
    }
}

impl From<&str> for ImageRecord {
    fn from(image_data: &str) -> Self {
        Self::new(image_data)
    }
}

impl AsRef<str> for ImageRecord {
    fn as_ref(&self) -> &str {
        &self.image_data
    }
}
