use crate::shared::artwork_image::ArtworkImage;
use crate::shared::extraction_error::ExtractionError;
use crate::shared::tag_record::TagRecord;

/// Domain interface for reading one audio file's tags and cover art.
///
/// A parser is bound to a single file at construction. Artwork extraction
/// is best-effort and never fails; metadata reports why it is unavailable.
pub trait TagParser: Send {
    fn parse_metadata(&self) -> Result<TagRecord, ExtractionError>;

    fn parse_artwork(&self) -> Option<ArtworkImage>;
}
