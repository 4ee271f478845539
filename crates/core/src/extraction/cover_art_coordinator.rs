use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::extraction::domain::artwork_extractor::ArtworkExtractor;
use crate::extraction::domain::artwork_sink::{ArtworkSink, ArtworkUpdate};
use crate::shared::artwork_image::ArtworkImage;
use crate::shared::constants::EXTRACT_THREAD_NAME;

/// Tracks the one file whose artwork should be on screen.
///
/// Every request extracts on its own worker thread. When a worker finishes
/// it applies its result only if its file is still the tracked one, so the
/// most recent request always wins and stale results are dropped. The
/// tracked file is checked and the sink is called under the same lock.
pub struct CoverArtCoordinator {
    tracked: Arc<Mutex<Option<PathBuf>>>,
    extractor: Arc<dyn ArtworkExtractor>,
    sink: Arc<dyn ArtworkSink>,
    default_image: Arc<ArtworkImage>,
}

impl CoverArtCoordinator {
    pub fn new(
        extractor: Arc<dyn ArtworkExtractor>,
        sink: Arc<dyn ArtworkSink>,
        default_image: ArtworkImage,
    ) -> Self {
        Self {
            tracked: Arc::new(Mutex::new(None)),
            extractor,
            sink,
            default_image: Arc::new(default_image),
        }
    }

    /// Starts extraction for `file`, or for the default artwork when `None`.
    ///
    /// Returns `None` without doing anything if `file` is already tracked.
    /// The returned handle may be joined or dropped.
    pub fn request(&self, file: Option<&Path>) -> Option<JoinHandle<()>> {
        let file = file.map(Path::to_path_buf);
        {
            let mut tracked = lock(&self.tracked);
            if file.is_some() && *tracked == file {
                log::debug!("Artwork for {:?} already requested", file);
                return None;
            }
            *tracked = file.clone();
        }

        let requested = file.clone();
        let tracked = Arc::clone(&self.tracked);
        let extractor = Arc::clone(&self.extractor);
        let sink = Arc::clone(&self.sink);
        let default_image = Arc::clone(&self.default_image);

        let spawned = thread::Builder::new()
            .name(EXTRACT_THREAD_NAME.to_string())
            .spawn(move || {
                let extracted = file.as_deref().and_then(|path| extractor.extract(path));
                let update = match extracted {
                    Some(image) => ArtworkUpdate {
                        file,
                        image: Arc::new(image),
                        is_default: false,
                    },
                    None => ArtworkUpdate {
                        file,
                        image: default_image,
                        is_default: true,
                    },
                };

                let current = lock(&tracked);
                if *current != update.file {
                    log::debug!(
                        "Discarding artwork for {:?}, now tracking {:?}",
                        update.file,
                        *current
                    );
                    return;
                }
                sink.apply(update);
            });

        match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("Failed to spawn artwork extraction thread: {e}");
                self.abandon(&requested);
                None
            }
        }
    }

    /// Untracks a request that will never run and shows the default artwork,
    /// unless a newer request has already replaced it.
    fn abandon(&self, file: &Option<PathBuf>) {
        let mut tracked = lock(&self.tracked);
        if *tracked != *file {
            return;
        }
        *tracked = None;
        self.sink.apply(ArtworkUpdate {
            file: None,
            image: Arc::clone(&self.default_image),
            is_default: true,
        });
    }

    /// Forgets the tracked file and shows the default artwork right away.
    ///
    /// Any extraction still running will find itself stale and be dropped.
    pub fn set_default(&self) {
        let mut tracked = lock(&self.tracked);
        *tracked = None;
        self.sink.apply(ArtworkUpdate {
            file: None,
            image: Arc::clone(&self.default_image),
            is_default: true,
        });
    }

    /// The file whose artwork is currently wanted.
    pub fn current(&self) -> Option<PathBuf> {
        lock(&self.tracked).clone()
    }
}

/// A panicking sink must not wedge every later request.
fn lock(tracked: &Mutex<Option<PathBuf>>) -> MutexGuard<'_, Option<PathBuf>> {
    tracked.lock().unwrap_or_else(PoisonError::into_inner)
}
