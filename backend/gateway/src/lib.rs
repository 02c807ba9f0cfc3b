//! SmileCheck HTTP gateway.
//!
//! Serves the evaluation page, the upload endpoint, the prompt panel, and
//! the stored images. Notices survive redirects in a signed cookie.

pub mod backend_panel;
pub mod error;
pub mod evaluation;
pub mod flash;
pub mod render;
pub mod server;

pub use error::ApiError;
pub use flash::{FlashSigner, FLASH_COOKIE};
pub use server::{build_router, start_server, GatewayState};
