use std::path::PathBuf;
use std::sync::Arc;

use lofty::file::FileType;

use crate::artwork::infrastructure::fallback_image_decoder::FallbackImageDecoder;
use crate::container::infrastructure::data_box_extractor::read_cover_payload;
use crate::shared::artwork_image::ArtworkImage;
use crate::shared::extraction_error::ExtractionError;
use crate::shared::tag_record::TagRecord;
use crate::tags::domain::tag_parser::TagParser;

use super::generic_tag_parser::GenericTagLibraryParser;
use super::lofty_tag_library::LoftyTagLibrary;

/// Parser for MP4/M4A files.
///
/// Tags come from the tag library forced to the MP4 file type. Cover art is
/// read straight from `moov/udta/meta/ilst/covr/data` and decoded according
/// to the data box type flag.
pub struct Mp4Parser {
    path: PathBuf,
    tags: GenericTagLibraryParser,
    decoder: Arc<FallbackImageDecoder>,
}

impl Mp4Parser {
    pub fn new(path: impl Into<PathBuf>, decoder: Arc<FallbackImageDecoder>) -> Self {
        let path = path.into();
        let tags = GenericTagLibraryParser::new(
            path.clone(),
            Arc::new(LoftyTagLibrary::with_file_type(FileType::Mp4)),
            decoder.clone(),
        );
        Self {
            path,
            tags,
            decoder,
        }
    }

    fn read_artwork(&self) -> Result<Option<ArtworkImage>, ExtractionError> {
        let payload = read_cover_payload(&self.path)?;
        let hint = payload
            .image_hint()
            .ok_or(ExtractionError::UnsupportedImageFormat {
                type_flag: payload.type_flag,
            })?;
        Ok(self.decoder.decode(&payload.bytes, hint))
    }
}

impl TagParser for Mp4Parser {
    fn parse_metadata(&self) -> Result<TagRecord, ExtractionError> {
        self.tags.parse_metadata()
    }

    fn parse_artwork(&self) -> Option<ArtworkImage> {
        match self.read_artwork() {
            Ok(image) => image,
            Err(e) => {
                log::debug!("No cover art in {}: {e}", self.path.display());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_fixtures::{
        cover_art_mp4, encode_jpeg, encode_png, mp4_without_item_list, with_broken_exif,
    };
    use rstest::rstest;

    fn parser_for(bytes: Vec<u8>) -> (tempfile::TempDir, Mp4Parser) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.m4a");
        std::fs::write(&path, bytes).unwrap();
        let parser = Mp4Parser::new(path, Arc::new(FallbackImageDecoder::default()));
        (dir, parser)
    }

    #[test]
    fn test_jpeg_flagged_cover_is_decoded() {
        let (_dir, parser) = parser_for(cover_art_mp4(13, &encode_jpeg(12, 7)));
        let image = parser.parse_artwork().unwrap();
        assert_eq!(image.dimensions(), (12, 7));
    }

    #[test]
    fn test_png_flagged_cover_is_decoded() {
        let (_dir, parser) = parser_for(cover_art_mp4(14, &encode_png(3, 9)));
        let image = parser.parse_artwork().unwrap();
        assert_eq!(image.dimensions(), (3, 9));
    }

    #[test]
    fn test_broken_exif_jpeg_uses_fallback() {
        let (_dir, parser) = parser_for(cover_art_mp4(13, &with_broken_exif(&encode_jpeg(10, 10))));
        let image = parser.parse_artwork().unwrap();
        assert_eq!(image.dimensions(), (10, 10));
    }

    #[test]
    fn test_png_flagged_garbage_gets_no_fallback() {
        let (_dir, parser) = parser_for(cover_art_mp4(14, &with_broken_exif(&encode_jpeg(10, 10))));
        assert!(parser.parse_artwork().is_none());
    }

    #[rstest]
    #[case::cleared(0)]
    #[case::other_bits(4)]
    fn test_non_image_flag_has_no_artwork(#[case] flag: u32) {
        let (_dir, parser) = parser_for(cover_art_mp4(flag, &encode_jpeg(4, 4)));
        assert!(parser.parse_artwork().is_none());
        assert!(matches!(
            parser.read_artwork(),
            Err(ExtractionError::UnsupportedImageFormat { type_flag }) if type_flag == flag
        ));
    }

    #[test]
    fn test_missing_item_list_has_no_artwork() {
        let (_dir, parser) = parser_for(mp4_without_item_list());
        assert!(parser.parse_artwork().is_none());
        assert!(matches!(
            parser.read_artwork(),
            Err(ExtractionError::Container(_))
        ));
    }

    #[test]
    fn test_missing_file_has_no_artwork() {
        let parser = Mp4Parser::new(
            "/nonexistent/song.m4a",
            Arc::new(FallbackImageDecoder::default()),
        );
        assert!(parser.parse_artwork().is_none());
        assert!(parser.parse_metadata().is_err());
    }
}
