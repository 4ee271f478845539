pub mod fallback_image_decoder;
pub mod lenient_jpeg_decoder;
pub mod primary_image_decoder;
