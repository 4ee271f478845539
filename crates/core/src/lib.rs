pub mod shared {
    pub mod artwork_image;
    pub mod constants;
    pub mod extraction_error;
    pub mod image_hint;
    pub mod tag_record;
    #[cfg(test)]
    pub mod test_fixtures;
}

pub mod container {
    pub mod domain {
        pub mod box_node;
        pub mod box_path;
        pub mod container_error;
        pub mod data_box;
    }
    pub mod infrastructure;
}

pub mod artwork {
    pub mod domain {
        pub mod image_decoder;
    }
    pub mod infrastructure;
}

pub mod tags {
    pub mod domain {
        pub mod parser_kind;
        pub mod sanitizer;
        pub mod tag_parser;
        pub mod tag_source;
    }
    pub mod infrastructure;
}

pub mod extraction {
    pub mod cover_art_coordinator;
    pub mod metadata_extractor;
    pub mod domain {
        pub mod artwork_extractor;
        pub mod artwork_sink;
    }
    pub mod infrastructure;
}
