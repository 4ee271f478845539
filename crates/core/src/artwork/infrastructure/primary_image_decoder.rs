use image::{ImageError, ImageFormat};

use crate::artwork::domain::image_decoder::{DecodeError, ImageDecoder};
use crate::shared::artwork_image::ArtworkImage;
use crate::shared::image_hint::ImageHint;

/// Strict decoder backed by the `image` crate.
///
/// Content sniffing wins over the hint: cover art is often labelled with
/// the wrong type, and a recognisable signature is more reliable than a tag
/// flag. The hint only decides the format when sniffing finds nothing.
pub struct PrimaryImageDecoder;

impl PrimaryImageDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PrimaryImageDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageDecoder for PrimaryImageDecoder {
    fn decode(&self, bytes: &[u8], hint: ImageHint) -> Result<ArtworkImage, DecodeError> {
        let format = match (image::guess_format(bytes).ok(), hint) {
            (Some(sniffed), _) => sniffed,
            (None, ImageHint::Jpeg) => ImageFormat::Jpeg,
            (None, ImageHint::Png) => ImageFormat::Png,
            (None, ImageHint::Unknown) => {
                return Err(DecodeError::UnsupportedFormat(
                    "unrecognised image signature".to_string(),
                ))
            }
        };

        image::load_from_memory_with_format(bytes, format)
            .map(ArtworkImage::from)
            .map_err(map_image_error)
    }
}

fn map_image_error(err: ImageError) -> DecodeError {
    match err {
        ImageError::Decoding(e) => DecodeError::UnsupportedFormat(e.to_string()),
        ImageError::Unsupported(e) => DecodeError::UnsupportedFormat(e.to_string()),
        // Running out of an in-memory buffer means the data is cut short.
        ImageError::IoError(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            DecodeError::UnsupportedFormat(e.to_string())
        }
        ImageError::IoError(e) => DecodeError::Io(e),
        ImageError::Limits(e) => DecodeError::Limits(e.to_string()),
        other => DecodeError::Other(other.to_string()),
    }
}
