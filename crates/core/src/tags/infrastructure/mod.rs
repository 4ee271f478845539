pub mod generic_tag_parser;
pub mod lofty_tag_library;
pub mod mp4_tag_parser;
pub mod parser_factory;
pub mod unsupported_parser;
