/// What the caller believes an image payload is encoded as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageHint {
    Jpeg,
    Png,
    Unknown,
}

impl ImageHint {
    /// Whether a failed primary decode may be retried with the lenient
    /// JPEG decoder.
    pub fn allows_jpeg_fallback(self) -> bool {
        matches!(self, ImageHint::Jpeg | ImageHint::Unknown)
    }
}
