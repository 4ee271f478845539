/// Extensions routed to the MP4 box-tree parser.
pub const MP4_EXTENSIONS: &[&str] = &["m4a", "m4b", "m4p", "mp4"];

/// Extensions routed to the generic tag-library parser.
pub const TAG_LIBRARY_EXTENSIONS: &[&str] = &[
    "mp3", "ogg", "oga", "opus", "flac", "wav", "aif", "aiff", "ape", "wv",
];

/// Box path of iTunes-style cover art inside an MP4 file.
pub const COVER_ART_PATH: &str = "moov/udta/meta/ilst/covr/data";

/// Data box type-flag bit marking a JPEG payload.
pub const DATA_FLAG_JPEG: u32 = 0x1;
/// Data box type-flag bit marking a PNG payload.
pub const DATA_FLAG_PNG: u32 = 0x2;

/// Largest leaf payload the box reader will load into memory (64 MiB).
pub const DEFAULT_MAX_PAYLOAD: u64 = 64 * 1024 * 1024;

/// Largest RGBA buffer the lenient JPEG decoder will allocate (64 MiB).
pub const DEFAULT_MAX_DECODED_BYTES: usize = 64 * 1024 * 1024;

/// Edge length of the built-in default artwork.
pub const DEFAULT_ARTWORK_SIZE: u32 = 350;

/// Thread name of coordinator workers.
pub const EXTRACT_THREAD_NAME: &str = "cover-art-extract";
