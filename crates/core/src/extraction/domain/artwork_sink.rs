use std::path::PathBuf;
use std::sync::Arc;

use crate::shared::artwork_image::ArtworkImage;

/// Artwork ready for display.
///
/// `file` is the request the image belongs to; `None` for default artwork
/// applied after [`set_default`](crate::extraction::cover_art_coordinator::CoverArtCoordinator::set_default).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtworkUpdate {
    pub file: Option<PathBuf>,
    pub image: Arc<ArtworkImage>,
    pub is_default: bool,
}

/// Receives the artwork that won the last-request race.
///
/// Called from worker threads; implementations must hand the update over to
/// the presentation layer without blocking for long.
pub trait ArtworkSink: Send + Sync {
    fn apply(&self, update: ArtworkUpdate);
}
