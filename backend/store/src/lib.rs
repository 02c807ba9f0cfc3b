//! `smilecheck-store`: persistence for the prompt set and the latest evaluation.
//!
//! Provides:
//! - Two singleton JSON documents (`prompts`, `state`) merged over defaults on read
//! - Full-replace writes with atomic temp-file rename
//! - A `DocumentStore` trait with file-backed and in-memory implementations
//! - Typed load/save helpers for `PromptSet` and `EvaluationState`

pub mod document;
pub mod io;
pub mod store;

pub use document::Document;
pub use store::{
    load_prompts, load_state, save_prompts, save_state, DocumentStore, InMemoryStore,
    JsonFileStore,
};
