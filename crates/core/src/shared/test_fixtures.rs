//! Builders for synthetic MP4 boxes and tiny encoded images.

use std::io::Cursor;

/// A plain box with a 32-bit size header.
pub fn mp4_box(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let size = (8 + payload.len()) as u32;
    let mut out = Vec::with_capacity(size as usize);
    out.extend_from_slice(&size.to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);
    out
}

/// A full box: version 0, zero flags, then `payload`.
pub fn full_box(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    mp4_box(kind, &[&[0u8; 4][..], payload].concat())
}

/// An iTunes `data` box: version, 24-bit type flag, locale, bytes.
pub fn data_box(type_flag: u32, bytes: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(8 + bytes.len());
    payload.extend_from_slice(&(type_flag & 0x00FF_FFFF).to_be_bytes());
    payload.extend_from_slice(&[0u8; 4]);
    payload.extend_from_slice(bytes);
    mp4_box(b"data", &payload)
}

/// `moov` tree without an `ilst`, i.e. a file with no iTunes metadata.
pub fn mp4_without_item_list() -> Vec<u8> {
    let meta = full_box(b"meta", &mp4_box(b"hdlr", &[0u8; 25]));
    let moov = mp4_box(b"moov", &mp4_box(b"udta", &meta));
    [mp4_box(b"ftyp", b"M4A \0\0\0\0"), moov].concat()
}

/// Minimal file carrying `image` as cover art with the given type flag.
pub fn cover_art_mp4(type_flag: u32, image: &[u8]) -> Vec<u8> {
    let covr = mp4_box(b"covr", &data_box(type_flag, image));
    let ilst = mp4_box(b"ilst", &covr);
    let meta = full_box(b"meta", &[mp4_box(b"hdlr", &[0u8; 25]), ilst].concat());
    let udta = mp4_box(b"udta", &meta);
    let moov = mp4_box(b"moov", &[mp4_box(b"mvhd", &[0u8; 100]), udta].concat());
    [mp4_box(b"ftyp", b"M4A \0\0\0\0"), moov, mp4_box(b"mdat", &[0u8; 16])].concat()
}

pub fn encode_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, image::ImageFormat::Jpeg)
}

pub fn encode_png(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, image::ImageFormat::Png)
}

fn encode(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 90]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, format)
        .unwrap();
    out.into_inner()
}

/// Inserts an APP1 segment whose declared length runs past the end of the
/// stream right after SOI, mimicking a broken EXIF block.
pub fn with_broken_exif(jpeg: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(jpeg.len() + 8);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1, 0xFF, 0xF0]);
    out.extend_from_slice(b"Exif");
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Rewrites the SOF0 dimensions without touching the scan data.
pub fn with_frame_size(jpeg: &[u8], width: u16, height: u16) -> Vec<u8> {
    let sof = jpeg
        .windows(2)
        .position(|w| w == [0xFF, 0xC0])
        .expect("baseline JPEG has an SOF0 marker");
    let mut out = jpeg.to_vec();
    out[sof + 5..sof + 7].copy_from_slice(&height.to_be_bytes());
    out[sof + 7..sof + 9].copy_from_slice(&width.to_be_bytes());
    out
}
