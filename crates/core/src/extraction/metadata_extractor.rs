use std::path::Path;

use crate::shared::tag_record::TagRecord;
use crate::tags::domain::tag_parser::TagParser;
use crate::tags::infrastructure::parser_factory::create_parser;

type ParserFactory = Box<dyn Fn(&Path) -> Box<dyn TagParser> + Send + Sync>;

/// Best-effort tag reading: any failure is logged and yields an empty record.
pub struct MetadataExtractor {
    parser_for: ParserFactory,
}

impl MetadataExtractor {
    pub fn new() -> Self {
        Self::with_parser_factory(Box::new(create_parser))
    }

    pub fn with_parser_factory(parser_for: ParserFactory) -> Self {
        Self { parser_for }
    }

    pub fn extract_tags(&self, path: &Path) -> TagRecord {
        match (self.parser_for)(path).parse_metadata() {
            Ok(record) => record,
            Err(e) => {
                log::warn!("No tags for {}: {e}", path.display());
                TagRecord::default()
            }
        }
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::artwork_image::ArtworkImage;
    use crate::shared::extraction_error::ExtractionError;
    use crate::tags::infrastructure::lofty_tag_library::tests::write_tagged_wav;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct StubParser {
        path: PathBuf,
        record: Option<TagRecord>,
    }

    impl TagParser for StubParser {
        fn parse_metadata(&self) -> Result<TagRecord, ExtractionError> {
            self.record.clone().ok_or(ExtractionError::TagRead {
                path: self.path.clone(),
                reason: "stub failure".into(),
            })
        }

        fn parse_artwork(&self) -> Option<ArtworkImage> {
            None
        }
    }

    // --- Tests ---

    #[test]
    fn test_returns_parsed_record() {
        let requested = Arc::new(Mutex::new(Vec::new()));
        let seen = requested.clone();
        let extractor = MetadataExtractor::with_parser_factory(Box::new(move |path: &Path| {
            seen.lock().unwrap().push(path.to_path_buf());
            Box::new(StubParser {
                path: path.to_path_buf(),
                record: Some(TagRecord {
                    title: Some("Naima".into()),
                    duration: 261,
                    ..Default::default()
                }),
            }) as Box<dyn TagParser>
        }));

        let record = extractor.extract_tags(Path::new("/music/naima.flac"));
        assert_eq!(record.title.as_deref(), Some("Naima"));
        assert_eq!(record.duration, 261);
        assert_eq!(
            *requested.lock().unwrap(),
            vec![PathBuf::from("/music/naima.flac")]
        );
    }

    #[test]
    fn test_failure_yields_empty_record() {
        let extractor = MetadataExtractor::with_parser_factory(Box::new(|path: &Path| {
            Box::new(StubParser {
                path: path.to_path_buf(),
                record: None,
            }) as Box<dyn TagParser>
        }));

        let record = extractor.extract_tags(Path::new("/music/broken.mp3"));
        assert_eq!(record, TagRecord::default());
    }

    #[test]
    fn test_unsupported_file_yields_empty_record() {
        let record = MetadataExtractor::new().extract_tags(Path::new("/music/notes.txt"));
        assert!(record.is_empty());
    }

    #[test]
    fn test_reads_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tagged_wav(dir.path());

        let record = MetadataExtractor::new().extract_tags(&path);
        assert_eq!(record.album.as_deref(), Some("Kind of Blue"));
    }
}
