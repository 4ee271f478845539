use std::path::Path;
use std::sync::Arc;

use crate::artwork::infrastructure::fallback_image_decoder::FallbackImageDecoder;
use crate::tags::domain::parser_kind::ParserKind;
use crate::tags::domain::tag_parser::TagParser;

use super::generic_tag_parser::GenericTagLibraryParser;
use super::lofty_tag_library::LoftyTagLibrary;
use super::mp4_tag_parser::Mp4Parser;
use super::unsupported_parser::UnsupportedParser;

/// Creates the parser for `path` with a fresh default decoder.
pub fn create_parser(path: &Path) -> Box<dyn TagParser> {
    create_parser_with_decoder(path, Arc::new(FallbackImageDecoder::default()))
}

/// Creates the parser for `path`, chosen by extension alone.
pub fn create_parser_with_decoder(
    path: &Path,
    decoder: Arc<FallbackImageDecoder>,
) -> Box<dyn TagParser> {
    let kind = ParserKind::for_path(path);
    log::debug!("Using {:?} parser for {}", kind, path.display());
    match kind {
        ParserKind::Mp4 => Box::new(Mp4Parser::new(path, decoder)),
        ParserKind::TagLibrary => Box::new(GenericTagLibraryParser::new(
            path,
            Arc::new(LoftyTagLibrary::new()),
            decoder,
        )),
        ParserKind::Unsupported => Box::new(UnsupportedParser::new(path)),
    }
}
