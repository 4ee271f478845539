use jpeg_decoder::PixelFormat;

use crate::artwork::domain::image_decoder::{DecodeError, ImageDecoder};
use crate::shared::artwork_image::{ArtworkImage, ARTWORK_CHANNELS};
use crate::shared::constants::DEFAULT_MAX_DECODED_BYTES;
use crate::shared::image_hint::ImageHint;

const SOI: u8 = 0xD8;
const EOI: u8 = 0xD9;
const SOS: u8 = 0xDA;

/// JPEG decoder for streams a strict decoder rejects.
///
/// Cover art written by tagging tools often carries EXIF, ICC or XMP
/// segments with bogus lengths. Before decoding with `jpeg-decoder`, the
/// stream is rewritten without any metadata segment (APP1-APP13, APP15,
/// COM); segments with impossible lengths are skipped by resynchronising on
/// the next marker. JFIF (APP0) and Adobe (APP14) segments are kept since
/// they affect color decoding.
///
/// The frame header is read before any pixel buffer is allocated; images
/// whose RGBA output would exceed the byte limit fail with
/// [`DecodeError::Limits`].
pub struct LenientJpegDecoder {
    max_decoded_bytes: usize,
}

impl LenientJpegDecoder {
    pub fn new() -> Self {
        Self {
            max_decoded_bytes: DEFAULT_MAX_DECODED_BYTES,
        }
    }

    pub fn with_max_decoded_bytes(mut self, bytes: usize) -> Self {
        self.max_decoded_bytes = bytes;
        self
    }
}

impl Default for LenientJpegDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageDecoder for LenientJpegDecoder {
    fn decode(&self, bytes: &[u8], _hint: ImageHint) -> Result<ArtworkImage, DecodeError> {
        let cleaned = scrub_segments(bytes).ok_or_else(|| {
            DecodeError::UnsupportedFormat("missing JPEG start-of-image marker".to_string())
        })?;

        let mut decoder = jpeg_decoder::Decoder::new(cleaned.as_slice());
        decoder.read_info().map_err(map_jpeg_error)?;
        let info = decoder
            .info()
            .ok_or_else(|| DecodeError::UnsupportedFormat("missing JPEG frame header".to_string()))?;

        let width = u32::from(info.width);
        let height = u32::from(info.height);
        let expected = rgba_len(width, height)
            .filter(|&len| len <= self.max_decoded_bytes)
            .ok_or_else(|| {
                DecodeError::Limits(format!(
                    "{width}x{height} JPEG exceeds the {} byte decode limit",
                    self.max_decoded_bytes
                ))
            })?;

        decoder.set_max_decoding_buffer_size(self.max_decoded_bytes);
        let pixels = decoder.decode().map_err(map_jpeg_error)?;
        let rgba = to_rgba(&pixels, info.pixel_format);
        if rgba.len() != expected {
            return Err(DecodeError::UnsupportedFormat(format!(
                "decoded {} RGBA bytes for a {width}x{height} image",
                rgba.len()
            )));
        }
        Ok(ArtworkImage::new(rgba, width, height))
    }
}

fn rgba_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(ARTWORK_CHANNELS)
}

fn map_jpeg_error(err: jpeg_decoder::Error) -> DecodeError {
    match err {
        jpeg_decoder::Error::Format(msg) => DecodeError::UnsupportedFormat(msg),
        jpeg_decoder::Error::Unsupported(feature) => {
            DecodeError::UnsupportedFormat(format!("unsupported feature: {feature:?}"))
        }
        jpeg_decoder::Error::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            DecodeError::UnsupportedFormat(e.to_string())
        }
        jpeg_decoder::Error::Io(e) => DecodeError::Io(e),
        other => DecodeError::Other(other.to_string()),
    }
}

fn to_rgba(pixels: &[u8], format: PixelFormat) -> Vec<u8> {
    match format {
        PixelFormat::L8 => pixels.iter().flat_map(|&l| [l, l, l, 255]).collect(),
        // Big-endian samples: the high byte comes first.
        PixelFormat::L16 => pixels
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0], 255])
            .collect(),
        PixelFormat::RGB24 => pixels
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .flat_map(|px| {
                let k = 255 - u16::from(px[3]);
                let channel = |v: u8| ((255 - u16::from(v)) * k / 255) as u8;
                [channel(px[0]), channel(px[1]), channel(px[2]), 255]
            })
            .collect(),
    }
}

/// Markers that can start a segment we may resynchronise on.
fn is_resync_marker(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xCF | 0xDA..=0xDD | 0xE0..=0xEF | 0xFE | EOI)
}

fn is_metadata_segment(marker: u8) -> bool {
    matches!(marker, 0xE1..=0xED | 0xEF | 0xFE)
}

fn next_marker(jpeg: &[u8], from: usize) -> Option<usize> {
    (from..jpeg.len().saturating_sub(1)).find(|&i| jpeg[i] == 0xFF && is_resync_marker(jpeg[i + 1]))
}

/// Rewrites `jpeg` without metadata segments. Returns `None` when the
/// stream does not start with SOI.
pub(crate) fn scrub_segments(jpeg: &[u8]) -> Option<Vec<u8>> {
    if jpeg.len() < 2 || jpeg[0] != 0xFF || jpeg[1] != SOI {
        return None;
    }

    let mut out = Vec::with_capacity(jpeg.len());
    out.extend_from_slice(&[0xFF, SOI]);
    let mut pos = 2;

    while pos + 1 < jpeg.len() {
        if jpeg[pos] != 0xFF {
            match next_marker(jpeg, pos) {
                Some(next) => {
                    pos = next;
                    continue;
                }
                None => break,
            }
        }
        // Fill bytes.
        if jpeg[pos + 1] == 0xFF {
            pos += 1;
            continue;
        }

        let marker = jpeg[pos + 1];
        match marker {
            EOI => {
                out.extend_from_slice(&[0xFF, EOI]);
                return Some(out);
            }
            SOS => {
                // Entropy-coded data and any later scans go through untouched.
                out.extend_from_slice(&jpeg[pos..]);
                return Some(out);
            }
            SOI | 0x01 | 0xD0..=0xD7 => {
                pos += 2;
            }
            _ => {
                if pos + 4 > jpeg.len() {
                    break;
                }
                let seg_len = usize::from(u16::from_be_bytes([jpeg[pos + 2], jpeg[pos + 3]]));
                let end = pos + 2 + seg_len;
                let plausible = seg_len >= 2
                    && end <= jpeg.len()
                    && (end == jpeg.len() || jpeg[end] == 0xFF);

                if !plausible {
                    if is_metadata_segment(marker) {
                        log::debug!("skipping damaged segment 0xFF{marker:02X} at offset {pos}");
                        match next_marker(jpeg, pos + 2) {
                            Some(next) => {
                                pos = next;
                                continue;
                            }
                            None => break,
                        }
                    }
                    // A damaged structural segment cannot be repaired here.
                    out.extend_from_slice(&jpeg[pos..]);
                    return Some(out);
                }

                if !is_metadata_segment(marker) {
                    out.extend_from_slice(&jpeg[pos..end]);
                }
                pos = end;
            }
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_fixtures::{encode_jpeg, encode_png, with_broken_exif, with_frame_size};

    fn segment(marker: u8, body: &[u8]) -> Vec<u8> {
        let len = (body.len() + 2) as u16;
        [&[0xFF, marker][..], &len.to_be_bytes(), body].concat()
    }

    #[test]
    fn test_decodes_clean_jpeg() {
        let img = LenientJpegDecoder::new()
            .decode(&encode_jpeg(20, 10), ImageHint::Jpeg)
            .unwrap();
        assert_eq!(img.dimensions(), (20, 10));
        assert_eq!(img.pixel(0, 0).unwrap()[3], 255);
    }

    #[test]
    fn test_decodes_jpeg_with_broken_exif() {
        let broken = with_broken_exif(&encode_jpeg(12, 7));
        let img = LenientJpegDecoder::new()
            .decode(&broken, ImageHint::Unknown)
            .unwrap();
        assert_eq!(img.dimensions(), (12, 7));
    }

    #[test]
    fn test_oversized_frame_is_rejected_before_decoding() {
        let bomb = with_broken_exif(&with_frame_size(&encode_jpeg(16, 16), 60000, 60000));
        let err = LenientJpegDecoder::new()
            .decode(&bomb, ImageHint::Jpeg)
            .unwrap_err();
        assert!(matches!(err, DecodeError::Limits(_)));
        assert!(!err.is_unsupported_format());
    }

    #[test]
    fn test_custom_decode_limit() {
        let jpeg = encode_jpeg(16, 16);
        let err = LenientJpegDecoder::new()
            .with_max_decoded_bytes(16 * 16 * 4 - 1)
            .decode(&jpeg, ImageHint::Jpeg)
            .unwrap_err();
        assert!(matches!(err, DecodeError::Limits(_)));

        let img = LenientJpegDecoder::new()
            .with_max_decoded_bytes(16 * 16 * 4)
            .decode(&jpeg, ImageHint::Jpeg)
            .unwrap();
        assert_eq!(img.dimensions(), (16, 16));
    }

    #[test]
    fn test_rejects_non_jpeg() {
        let err = LenientJpegDecoder::new()
            .decode(&encode_png(4, 4), ImageHint::Unknown)
            .unwrap_err();
        assert!(err.is_unsupported_format());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(LenientJpegDecoder::new().decode(&[], ImageHint::Jpeg).is_err());
    }

    #[test]
    fn test_scrub_drops_metadata_and_keeps_structure() {
        let stream = [
            vec![0xFF, SOI],
            segment(0xE0, b"JFIF\0"),
            segment(0xE1, b"Exif\0\0junk"),
            segment(0xE2, b"ICC_PROFILE"),
            segment(0xDB, &[0u8; 5]),
            segment(0xFE, b"comment"),
            segment(0xEE, b"Adobe"),
            vec![0xFF, SOS, 0x00, 0x02, 0x12, 0x34],
            vec![0xFF, EOI],
        ]
        .concat();

        let expected = [
            vec![0xFF, SOI],
            segment(0xE0, b"JFIF\0"),
            segment(0xDB, &[0u8; 5]),
            segment(0xEE, b"Adobe"),
            vec![0xFF, SOS, 0x00, 0x02, 0x12, 0x34],
            vec![0xFF, EOI],
        ]
        .concat();

        assert_eq!(scrub_segments(&stream).unwrap(), expected);
    }

    #[test]
    fn test_scrub_resyncs_after_overlong_segment() {
        let stream = [
            vec![0xFF, SOI],
            vec![0xFF, 0xE1, 0x7F, 0xFF, b'E', b'x'],
            segment(0xDB, &[1, 2, 3]),
            vec![0xFF, EOI],
        ]
        .concat();

        let expected = [vec![0xFF, SOI], segment(0xDB, &[1, 2, 3]), vec![0xFF, EOI]].concat();
        assert_eq!(scrub_segments(&stream).unwrap(), expected);
    }

    #[test]
    fn test_scrub_skips_fill_bytes_and_stray_markers() {
        let stream = [
            vec![0xFF, SOI, 0xFF, 0xFF],
            vec![0xFF, 0xD3],
            segment(0xC4, &[9]),
            vec![0xFF, EOI],
        ]
        .concat();
        let expected = [vec![0xFF, SOI], segment(0xC4, &[9]), vec![0xFF, EOI]].concat();
        assert_eq!(scrub_segments(&stream).unwrap(), expected);
    }

    #[test]
    fn test_scrub_requires_soi() {
        assert!(scrub_segments(b"\x89PNG").is_none());
        assert!(scrub_segments(&[0xFF]).is_none());
    }

    #[test]
    fn test_cmyk_conversion() {
        let rgba = to_rgba(&[0, 0, 0, 0, 255, 255, 255, 255], PixelFormat::CMYK32);
        assert_eq!(rgba, vec![255, 255, 255, 255, 0, 0, 0, 255]);
    }

    #[test]
    fn test_grayscale_conversion() {
        assert_eq!(to_rgba(&[7], PixelFormat::L8), vec![7, 7, 7, 255]);
        assert_eq!(to_rgba(&[9, 1], PixelFormat::L16), vec![9, 9, 9, 255]);
    }
}
