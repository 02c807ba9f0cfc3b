//! Image handling for SmileCheck: the enhancement stage, its colour filters,
//! and the HTTP server for stored images.

pub mod enhance;
pub mod filters;
pub mod media_server;
pub mod mime_detect;

pub use enhance::{generate_corrected_image, FilterEnhancer, SOURCE_NOT_FOUND_MESSAGE};
pub use media_server::media_router;
pub use mime_detect::{detect_mime_type, is_image, is_inline_safe};
