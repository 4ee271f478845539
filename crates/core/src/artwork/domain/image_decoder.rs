use thiserror::Error;

use crate::shared::artwork_image::ArtworkImage;
use crate::shared::image_hint::ImageHint;

#[derive(Error, Debug)]
pub enum DecodeError {
    /// The bytes are not an image this decoder understands, or are
    /// malformed. Only this kind of failure triggers a fallback decode.
    #[error("unsupported or malformed image data: {0}")]
    UnsupportedFormat(String),
    #[error("I/O error while decoding image: {0}")]
    Io(#[source] std::io::Error),
    #[error("image exceeds decoder limits: {0}")]
    Limits(String),
    #[error("image decoding failed: {0}")]
    Other(String),
}

impl DecodeError {
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, DecodeError::UnsupportedFormat(_))
    }
}

/// Domain interface for turning an encoded payload into pixels.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8], hint: ImageHint) -> Result<ArtworkImage, DecodeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unsupported_format_qualifies_for_fallback() {
        assert!(DecodeError::UnsupportedFormat("bad marker".into()).is_unsupported_format());
        assert!(!DecodeError::Io(std::io::Error::from(std::io::ErrorKind::Other)).is_unsupported_format());
        assert!(!DecodeError::Limits("too big".into()).is_unsupported_format());
        assert!(!DecodeError::Other("?".into()).is_unsupported_format());
    }
}
