//! The two persisted documents and their default mappings.

use serde_json::{json, Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Document {
    Prompts,
    State,
}

impl Document {
    pub const ALL: [Document; 2] = [Document::Prompts, Document::State];

    /// File name within the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Prompts => "prompts.json",
            Self::State => "state.json",
        }
    }

    /// Mapping every load is merged over.
    pub fn defaults(self) -> Map<String, Value> {
        let value = match self {
            Self::Prompts => json!({
                "analysis_prompt": "",
                "enhancement_prompt": "",
                "updated_at": null,
            }),
            Self::State => json!({
                "last_raw_response": null,
                "structured_findings": null,
                "original_image": null,
                "corrected_image": null,
                "updated_at": null,
            }),
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// Overlay `stored` on the defaults; stored keys win, explicit nulls included.
    pub fn merge_with_defaults(self, stored: Map<String, Value>) -> Map<String, Value> {
        let mut merged = self.defaults();
        merged.extend(stored);
        merged
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prompts => write!(f, "prompts"),
            Self::State => write!(f, "state"),
        }
    }
}
