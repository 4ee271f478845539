use std::path::PathBuf;

use crate::shared::artwork_image::ArtworkImage;
use crate::shared::extraction_error::ExtractionError;
use crate::shared::tag_record::TagRecord;
use crate::tags::domain::tag_parser::TagParser;

/// Stand-in for files no parser understands. Never opens the file.
pub struct UnsupportedParser {
    path: PathBuf,
}

impl UnsupportedParser {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TagParser for UnsupportedParser {
    fn parse_metadata(&self) -> Result<TagRecord, ExtractionError> {
        Err(ExtractionError::UnsupportedFileType {
            path: self.path.clone(),
        })
    }

    fn parse_artwork(&self) -> Option<ArtworkImage> {
        None
    }
}
