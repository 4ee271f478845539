use crossbeam_channel::Sender;

use crate::extraction::domain::artwork_sink::{ArtworkSink, ArtworkUpdate};

/// Forwards updates over a channel to whichever thread owns the display.
pub struct ChannelArtworkSink {
    tx: Sender<ArtworkUpdate>,
}

impl ChannelArtworkSink {
    pub fn new(tx: Sender<ArtworkUpdate>) -> Self {
        Self { tx }
    }
}

impl ArtworkSink for ChannelArtworkSink {
    fn apply(&self, update: ArtworkUpdate) {
        if self.tx.send(update).is_err() {
            log::debug!("Artwork receiver closed, dropping update");
        }
    }
}
