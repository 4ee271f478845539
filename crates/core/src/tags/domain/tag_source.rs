use std::path::Path;

use crate::shared::extraction_error::ExtractionError;

/// Semantic tag fields, independent of the on-disk frame or atom names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Title,
    Artist,
    Album,
    Comment,
    Genre,
    Track,
    Year,
}

impl FieldKey {
    pub const ALL: &[FieldKey] = &[
        FieldKey::Title,
        FieldKey::Artist,
        FieldKey::Album,
        FieldKey::Comment,
        FieldKey::Genre,
        FieldKey::Track,
        FieldKey::Year,
    ];
}

/// Read access to the tags and audio properties of one opened file.
///
/// Each lookup fails on its own; callers decide how to degrade.
pub trait TagSource {
    fn field(&self, key: FieldKey) -> Result<Option<String>, ExtractionError>;

    /// Track length in whole seconds.
    fn duration_secs(&self) -> u64;

    /// Bitrate label such as `"320"` or `"~192"`.
    fn bitrate_label(&self) -> Option<String>;

    /// Raw bytes and MIME type of the first embedded picture.
    fn first_artwork(&self) -> Result<Option<(Vec<u8>, Option<String>)>, ExtractionError>;
}

/// Opens files with a tag-reading library.
pub trait TagLibrary: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn TagSource>, ExtractionError>;
}
