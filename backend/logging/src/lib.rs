//! Structured logging for SmileCheck.

pub mod logger;

pub use logger::{env_filter, init_logger};
