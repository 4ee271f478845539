use std::path::Path;
use std::sync::Arc;

use crate::artwork::infrastructure::fallback_image_decoder::FallbackImageDecoder;
use crate::extraction::domain::artwork_extractor::ArtworkExtractor;
use crate::shared::artwork_image::ArtworkImage;
use crate::tags::infrastructure::parser_factory::create_parser_with_decoder;

/// Extracts artwork with the parser chosen for each file's extension.
pub struct ParserArtworkExtractor {
    decoder: Arc<FallbackImageDecoder>,
}

impl ParserArtworkExtractor {
    pub fn new() -> Self {
        Self {
            decoder: Arc::new(FallbackImageDecoder::default()),
        }
    }
}

impl Default for ParserArtworkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtworkExtractor for ParserArtworkExtractor {
    fn extract(&self, path: &Path) -> Option<ArtworkImage> {
        create_parser_with_decoder(path, self.decoder.clone()).parse_artwork()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_fixtures::{cover_art_mp4, encode_png};

    #[test]
    fn test_extracts_mp4_cover() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.m4a");
        std::fs::write(&path, cover_art_mp4(14, &encode_png(4, 2))).unwrap();

        let image = ParserArtworkExtractor::new().extract(&path).unwrap();
        assert_eq!(image.dimensions(), (4, 2));
        assert_eq!(image.pixel(0, 0), Some([200, 40, 90, 255]));
    }

    #[test]
    fn test_unsupported_file_has_no_artwork() {
        assert!(ParserArtworkExtractor::new()
            .extract(Path::new("/music/playlist.m3u"))
            .is_none());
    }
}
