use std::path::Path;

use lofty::file::{AudioFile, FileType, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};

use crate::shared::extraction_error::ExtractionError;
use crate::tags::domain::tag_source::{FieldKey, TagLibrary, TagSource};

/// [`TagLibrary`] backed by `lofty`.
///
/// The file type is guessed from the extension and content unless forced,
/// which the MP4 parser does so that `.mp4`/`.m4b` files are always read as
/// iTunes-style atoms.
#[derive(Clone, Debug, Default)]
pub struct LoftyTagLibrary {
    file_type: Option<FileType>,
}

impl LoftyTagLibrary {
    pub fn new() -> Self {
        Self { file_type: None }
    }

    pub fn with_file_type(file_type: FileType) -> Self {
        Self {
            file_type: Some(file_type),
        }
    }
}

impl TagLibrary for LoftyTagLibrary {
    fn open(&self, path: &Path) -> Result<Box<dyn TagSource>, ExtractionError> {
        let tag_read = |reason: String| ExtractionError::TagRead {
            path: path.to_path_buf(),
            reason,
        };

        let probe = Probe::open(path).map_err(|e| tag_read(e.to_string()))?;
        let probe = match self.file_type {
            Some(file_type) => probe.set_file_type(file_type),
            None => probe.guess_file_type().map_err(|e| tag_read(e.to_string()))?,
        };
        let tagged = probe.read().map_err(|e| tag_read(e.to_string()))?;

        let properties = tagged.properties();
        let tag = tagged.primary_tag().or_else(|| tagged.first_tag()).cloned();
        if tag.is_none() {
            log::debug!("No tags in {}", path.display());
        }

        Ok(Box::new(LoftyTagSource {
            tag,
            duration_secs: properties.duration().as_secs(),
            bitrate_kbps: properties.audio_bitrate().or(properties.overall_bitrate()),
        }))
    }
}

struct LoftyTagSource {
    tag: Option<Tag>,
    duration_secs: u64,
    bitrate_kbps: Option<u32>,
}

impl LoftyTagSource {
    fn text(&self, key: &ItemKey) -> Option<String> {
        self.tag
            .as_ref()
            .and_then(|tag| tag.get_string(key))
            .map(str::to_owned)
    }
}

impl TagSource for LoftyTagSource {
    fn field(&self, key: FieldKey) -> Result<Option<String>, ExtractionError> {
        let value = match key {
            FieldKey::Title => self.text(&ItemKey::TrackTitle),
            FieldKey::Artist => self.text(&ItemKey::TrackArtist),
            FieldKey::Album => self.text(&ItemKey::AlbumTitle),
            FieldKey::Comment => self.text(&ItemKey::Comment),
            FieldKey::Genre => self.text(&ItemKey::Genre),
            FieldKey::Track => self.text(&ItemKey::TrackNumber),
            // ID3v2.4 keeps the year inside the recording date.
            FieldKey::Year => self
                .text(&ItemKey::Year)
                .or_else(|| self.text(&ItemKey::RecordingDate)),
        };
        Ok(value)
    }

    fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    fn bitrate_label(&self) -> Option<String> {
        self.bitrate_kbps
            .filter(|&kbps| kbps > 0)
            .map(|kbps| kbps.to_string())
    }

    fn first_artwork(&self) -> Result<Option<(Vec<u8>, Option<String>)>, ExtractionError> {
        let picture = self.tag.as_ref().and_then(|tag| tag.pictures().first());
        Ok(picture.map(|p| {
            (
                p.data().to_vec(),
                p.mime_type().map(|m| m.as_str().to_string()),
            )
        }))
    }
}
