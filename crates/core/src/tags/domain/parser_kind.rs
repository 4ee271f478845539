use std::path::Path;

use crate::shared::constants::{MP4_EXTENSIONS, TAG_LIBRARY_EXTENSIONS};

/// Which parser handles a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParserKind {
    /// MP4/M4A: artwork straight from the box tree.
    Mp4,
    /// Formats the tag library reads end to end (ID3, Vorbis comments, ...).
    TagLibrary,
    Unsupported,
}

impl ParserKind {
    /// Selects by case-insensitive extension; never touches the file.
    pub fn for_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::for_extension)
            .unwrap_or(ParserKind::Unsupported)
    }

    pub fn for_extension(ext: &str) -> Self {
        let ext = ext.to_ascii_lowercase();
        if MP4_EXTENSIONS.contains(&ext.as_str()) {
            ParserKind::Mp4
        } else if TAG_LIBRARY_EXTENSIONS.contains(&ext.as_str()) {
            ParserKind::TagLibrary
        } else {
            ParserKind::Unsupported
        }
    }
}
