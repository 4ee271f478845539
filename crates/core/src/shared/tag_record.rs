use serde::Serialize;

/// Format-independent metadata of one audio file.
///
/// Every field is independently optional: a file with only a title is as
/// valid as one with full tags. `duration` is in whole seconds and is `0`
/// when the source reports nothing. `bitrate` is a label rather than a
/// number because some sources report approximations such as `"~128"`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TagRecord {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub comment: Option<String>,
    pub genre: Option<String>,
    pub track: Option<String>,
    pub year: Option<String>,
    pub duration: u64,
    pub bitrate: Option<String>,
}

impl TagRecord {
    /// True when no descriptive field is present.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.artist.is_none()
            && self.album.is_none()
            && self.comment.is_none()
            && self.genre.is_none()
            && self.track.is_none()
            && self.year.is_none()
    }
}
