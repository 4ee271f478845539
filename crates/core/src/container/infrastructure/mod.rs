pub mod box_reader;
pub mod data_box_extractor;
