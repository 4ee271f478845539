use std::path::Path;

use crate::shared::artwork_image::ArtworkImage;

/// Domain interface for pulling decoded cover art out of an audio file.
///
/// Best-effort: every failure yields `None`.
pub trait ArtworkExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Option<ArtworkImage>;
}
