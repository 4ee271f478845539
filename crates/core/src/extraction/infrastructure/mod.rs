pub mod channel_artwork_sink;
pub mod parser_artwork_extractor;
