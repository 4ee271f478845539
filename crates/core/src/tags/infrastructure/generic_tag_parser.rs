use std::path::PathBuf;
use std::sync::Arc;

use crate::artwork::infrastructure::fallback_image_decoder::FallbackImageDecoder;
use crate::shared::artwork_image::ArtworkImage;
use crate::shared::extraction_error::ExtractionError;
use crate::shared::image_hint::ImageHint;
use crate::shared::tag_record::TagRecord;
use crate::tags::domain::sanitizer::sanitize;
use crate::tags::domain::tag_parser::TagParser;
use crate::tags::domain::tag_source::{FieldKey, TagLibrary, TagSource};

/// Parser for every format the tag library reads end to end.
///
/// A field that fails to read is logged and left absent; the other fields
/// are still returned.
pub struct GenericTagLibraryParser {
    path: PathBuf,
    library: Arc<dyn TagLibrary>,
    decoder: Arc<FallbackImageDecoder>,
}

impl GenericTagLibraryParser {
    pub fn new(
        path: impl Into<PathBuf>,
        library: Arc<dyn TagLibrary>,
        decoder: Arc<FallbackImageDecoder>,
    ) -> Self {
        Self {
            path: path.into(),
            library,
            decoder,
        }
    }

    fn read_field(&self, source: &dyn TagSource, key: FieldKey) -> Option<String> {
        match source.field(key) {
            Ok(value) => sanitize(value),
            Err(e) => {
                log::warn!("{}: {e}", self.path.display());
                None
            }
        }
    }
}

impl TagParser for GenericTagLibraryParser {
    fn parse_metadata(&self) -> Result<TagRecord, ExtractionError> {
        let source = self.library.open(&self.path)?;
        let source = source.as_ref();

        Ok(TagRecord {
            title: self.read_field(source, FieldKey::Title),
            artist: self.read_field(source, FieldKey::Artist),
            album: self.read_field(source, FieldKey::Album),
            comment: self.read_field(source, FieldKey::Comment),
            genre: self.read_field(source, FieldKey::Genre),
            track: self.read_field(source, FieldKey::Track),
            year: self.read_field(source, FieldKey::Year),
            duration: source.duration_secs(),
            bitrate: sanitize(source.bitrate_label()),
        })
    }

    fn parse_artwork(&self) -> Option<ArtworkImage> {
        let source = match self.library.open(&self.path) {
            Ok(source) => source,
            Err(e) => {
                log::warn!("No artwork for {}: {e}", self.path.display());
                return None;
            }
        };

        let (bytes, mime) = match source.first_artwork() {
            Ok(Some(picture)) => picture,
            Ok(None) => {
                log::debug!("{} has no embedded picture", self.path.display());
                return None;
            }
            Err(e) => {
                log::warn!("No artwork for {}: {e}", self.path.display());
                return None;
            }
        };

        // Picture MIME labels are unreliable; the decoder sniffs the bytes.
        log::debug!(
            "Decoding {} byte picture ({}) from {}",
            bytes.len(),
            mime.as_deref().unwrap_or("no MIME type"),
            self.path.display()
        );
        self.decoder.decode(&bytes, ImageHint::Unknown)
    }
}
