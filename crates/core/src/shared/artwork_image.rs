use ndarray::{ArrayView3, Axis};

use crate::shared::constants::DEFAULT_ARTWORK_SIZE;

/// Bytes per pixel of a decoded artwork buffer (RGBA).
pub const ARTWORK_CHANNELS: usize = 4;

const PLACEHOLDER_RGBA: [u8; 4] = [64, 64, 64, 255];

/// A fully decoded cover-art image: contiguous RGBA bytes in row-major order.
///
/// Decoders either produce a complete buffer or nothing; there is no
/// partially decoded state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtworkImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl ArtworkImage {
    /// Wraps a buffer whose length is exactly `width * height * 4`; decoders
    /// check this before calling.
    pub(crate) fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * ARTWORK_CHANNELS,
            "data length must equal width * height * 4"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// A single-color image, used for default artwork and tests.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = (width as usize) * (height as usize);
        let data = rgba.iter().copied().cycle().take(pixels * ARTWORK_CHANNELS).collect();
        Self::new(data, width, height)
    }

    /// Built-in default artwork shown when a file has none.
    pub fn placeholder() -> Self {
        Self::solid(
            DEFAULT_ARTWORK_SIZE,
            DEFAULT_ARTWORK_SIZE,
            PLACEHOLDER_RGBA,
        )
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// RGBA value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * ARTWORK_CHANNELS;
        let px = &self.data[idx..idx + ARTWORK_CHANNELS];
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (self.height as usize, self.width as usize, ARTWORK_CHANNELS),
            &self.data,
        )
        .expect("ArtworkImage data length must match dimensions")
    }

    /// Mean RGBA value over all pixels; `None` for an empty image.
    pub fn average_rgba(&self) -> Option<[u8; 4]> {
        let pixels = (self.width as u64) * (self.height as u64);
        if pixels == 0 {
            return None;
        }
        let sums = self
            .as_ndarray()
            .mapv(u64::from)
            .sum_axis(Axis(0))
            .sum_axis(Axis(0));
        let mut out = [0u8; 4];
        for (slot, sum) in out.iter_mut().zip(sums.iter()) {
            *slot = (sum / pixels) as u8;
        }
        Some(out)
    }

    /// Converts into an `image` buffer, e.g. for writing to disk.
    pub fn into_rgba_image(self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data)
    }
}

impl From<image::DynamicImage> for ArtworkImage {
    fn from(img: image::DynamicImage) -> Self {
        let rgba = img.into_rgba8();
        let (width, height) = rgba.dimensions();
        Self::new(rgba.into_raw(), width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 2 * 3 * 4];
        let img = ArtworkImage::new(data.clone(), 2, 3);
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 3);
        assert_eq!(img.dimensions(), (2, 3));
        assert_eq!(img.data(), &data[..]);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * 4")]
    fn test_mismatched_data_length_panics_in_debug() {
        ArtworkImage::new(vec![0u8; 10], 2, 2);
    }

    #[test]
    fn test_solid_fills_every_pixel() {
        let img = ArtworkImage::solid(3, 2, [10, 20, 30, 255]);
        assert_eq!(img.data().len(), 3 * 2 * 4);
        assert_eq!(img.pixel(0, 0), Some([10, 20, 30, 255]));
        assert_eq!(img.pixel(2, 1), Some([10, 20, 30, 255]));
    }

    #[test]
    fn test_placeholder_is_square_and_opaque() {
        let img = ArtworkImage::placeholder();
        assert_eq!(img.dimensions(), (DEFAULT_ARTWORK_SIZE, DEFAULT_ARTWORK_SIZE));
        assert_eq!(img.pixel(349, 349).map(|px| px[3]), Some(255));
    }

    #[test]
    fn test_pixel_out_of_bounds_is_none() {
        let img = ArtworkImage::solid(2, 2, [0, 0, 0, 255]);
        assert_eq!(img.pixel(2, 0), None);
        assert_eq!(img.pixel(0, 2), None);
    }

    #[test]
    fn test_as_ndarray_shape_and_access() {
        let mut data = vec![0u8; 2 * 4 * 4];
        // row=1, col=0, R
        data[4 * 4] = 255;
        let img = ArtworkImage::new(data, 4, 2);
        let arr = img.as_ndarray();
        assert_eq!(arr.shape(), &[2, 4, 4]);
        assert_eq!(arr[[1, 0, 0]], 255);
        assert_eq!(arr[[1, 0, 1]], 0);
    }

    #[test]
    fn test_average_rgba() {
        let mut data = ArtworkImage::solid(2, 1, [0, 0, 0, 255]).data().to_vec();
        data[0] = 200;
        data[2] = 51;
        let img = ArtworkImage::new(data, 2, 1);
        assert_eq!(img.average_rgba(), Some([100, 0, 25, 255]));
        assert_eq!(ArtworkImage::new(Vec::new(), 0, 0).average_rgba(), None);
    }

    #[test]
    fn test_from_dynamic_image_converts_to_rgba() {
        let rgb = image::RgbImage::from_pixel(5, 4, image::Rgb([1, 2, 3]));
        let img = ArtworkImage::from(image::DynamicImage::ImageRgb8(rgb));
        assert_eq!(img.dimensions(), (5, 4));
        assert_eq!(img.pixel(4, 3), Some([1, 2, 3, 255]));
    }

    #[test]
    fn test_into_rgba_image_round_trips_dimensions() {
        let img = ArtworkImage::solid(7, 3, [9, 9, 9, 9]);
        let buf = img.into_rgba_image().unwrap();
        assert_eq!(buf.dimensions(), (7, 3));
    }
}
