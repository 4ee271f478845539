use crate::shared::constants::{DATA_FLAG_JPEG, DATA_FLAG_PNG};
use crate::shared::image_hint::ImageHint;

/// Contents of an iTunes `data` box: the 24-bit type flag and raw bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataBoxPayload {
    pub type_flag: u32,
    pub bytes: Vec<u8>,
}

impl DataBoxPayload {
    /// Image hint implied by the type flag. The JPEG bit wins when both
    /// bits are set; `None` means the payload is not an image we decode.
    pub fn image_hint(&self) -> Option<ImageHint> {
        if self.type_flag & DATA_FLAG_JPEG == DATA_FLAG_JPEG {
            Some(ImageHint::Jpeg)
        } else if self.type_flag & DATA_FLAG_PNG == DATA_FLAG_PNG {
            Some(ImageHint::Png)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::itunes_jpeg(13, Some(ImageHint::Jpeg))]
    #[case::itunes_png(14, Some(ImageHint::Png))]
    #[case::bare_jpeg_bit(1, Some(ImageHint::Jpeg))]
    #[case::bare_png_bit(2, Some(ImageHint::Png))]
    #[case::bmp(27, Some(ImageHint::Jpeg))]
    #[case::other_bits(4, None)]
    #[case::cleared(0, None)]
    fn test_image_hint_from_flag(#[case] flag: u32, #[case] expected: Option<ImageHint>) {
        let payload = DataBoxPayload {
            type_flag: flag,
            bytes: vec![],
        };
        assert_eq!(payload.image_hint(), expected);
    }
}
