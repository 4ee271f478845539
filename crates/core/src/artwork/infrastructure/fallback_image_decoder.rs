use crate::artwork::domain::image_decoder::ImageDecoder;
use crate::shared::artwork_image::ArtworkImage;
use crate::shared::image_hint::ImageHint;

use super::lenient_jpeg_decoder::LenientJpegDecoder;
use super::primary_image_decoder::PrimaryImageDecoder;

/// Two-tier decode: strict decoder first, lenient JPEG decoder second.
///
/// The second tier runs only when the first reports unsupported or
/// malformed data and the payload may be a JPEG (hint `Jpeg` or `Unknown`).
/// PNG-flagged payloads get no second chance. Every failure ends in `None`
/// and a log record; nothing is raised to the caller.
pub struct FallbackImageDecoder {
    primary: Box<dyn ImageDecoder>,
    secondary: Box<dyn ImageDecoder>,
}

impl FallbackImageDecoder {
    pub fn new(primary: Box<dyn ImageDecoder>, secondary: Box<dyn ImageDecoder>) -> Self {
        Self { primary, secondary }
    }

    pub fn decode(&self, bytes: &[u8], hint: ImageHint) -> Option<ArtworkImage> {
        let err = match self.primary.decode(bytes, hint) {
            Ok(image) => return Some(image),
            Err(err) => err,
        };

        if !err.is_unsupported_format() || !hint.allows_jpeg_fallback() {
            log::warn!("Unable to decode {hint:?} artwork ({} bytes): {err}", bytes.len());
            return None;
        }

        log::debug!("Primary decoder rejected artwork ({err}), retrying as lenient JPEG");
        match self.secondary.decode(bytes, hint) {
            Ok(image) => Some(image),
            Err(fallback_err) => {
                log::warn!(
                    "Unable to decode artwork ({} bytes): {err}; fallback: {fallback_err}",
                    bytes.len()
                );
                None
            }
        }
    }
}

impl Default for FallbackImageDecoder {
    fn default() -> Self {
        Self::new(
            Box::new(PrimaryImageDecoder::new()),
            Box::new(LenientJpegDecoder::new()),
        )
    }
}
