use base64::prelude::*;
use crate::{models::ImageRecord, ImageDataError};

/// Largest encoded image string accepted by default, 10MB.
pub const MAX_IMAGE_DATA_BYTES: usize = 10 * 1024 * 1024;

/// Size policy applied by whoever receives an [`ImageRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLimits {
    pub max_encoded_bytes: usize,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self::new(MAX_IMAGE_DATA_BYTES)
    }
}

impl ImageLimits {
    pub fn new(max_encoded_bytes: usize) -> Self {
        Self { max_encoded_bytes }
    }

    pub fn check_size(&self, record: &ImageRecord) -> Result<(), ImageDataError> {
        self.check_encoded_len(record.encoded_len())
    }

    pub fn check_encoded_len(&self, len: usize) -> Result<(), ImageDataError> {
        if len > self.max_encoded_bytes {
            tracing::debug!(len, max = self.max_encoded_bytes, "image data over size limit");
            return Err(ImageDataError::PayloadTooLarge {
                len,
                max: self.max_encoded_bytes,
            });
        }

        Ok(())
    }

    /// Checks the encoded length `raw_len` bytes would have, without encoding them.
    pub fn check_raw_len(&self, raw_len: u64) -> Result<(), ImageDataError> {
        let len = usize::try_from(raw_len)
            .ok()
            .and_then(|n| base64::encoded_len(n, true))
            .unwrap_or(usize::MAX);

        self.check_encoded_len(len)
    }

    /// Checks the size bound, then decodes the base64 payload.
    ///
    /// The decoded bytes are returned untouched; nothing here verifies they are a PNG.
    pub fn decode(&self, record: &ImageRecord) -> Result<Vec<u8>, ImageDataError> {
        self.check_size(record)?;

        BASE64_STANDARD.decode(record.image_data()).map_err(|err| {
            tracing::debug!("image data failed to decode: {err}");
            ImageDataError::InvalidEncoding(err)
        })
    }
}
