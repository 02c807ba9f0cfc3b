use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use smilecheck_core::{EvaluationState, PromptSet, SmileError};
use tokio::sync::RwLock;
use tracing::info;

use crate::document::Document;
use crate::io::{read_json, write_json};

/// Abstract interface over the persisted documents.
///
/// `load` always returns the stored mapping merged over the document
/// defaults; `save` replaces the whole document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load(&self, document: Document) -> Result<Map<String, Value>, SmileError>;

    async fn save(&self, document: Document, content: &Map<String, Value>) -> Result<(), SmileError>;
}

/// Documents stored as `<data_dir>/prompts.json` and `<data_dir>/state.json`.
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        info!(data_dir = %data_dir.display(), "Document store opened");
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn document_path(&self, document: Document) -> PathBuf {
        self.data_dir.join(document.file_name())
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self, document: Document) -> Result<Map<String, Value>, SmileError> {
        let stored = read_json(&self.document_path(document), &document.to_string()).await?;
        Ok(document.merge_with_defaults(stored.unwrap_or_default()))
    }

    async fn save(&self, document: Document, content: &Map<String, Value>) -> Result<(), SmileError> {
        write_json(&self.document_path(document), content).await?;
        info!(document = %document, "Saved document");
        Ok(())
    }
}

/// Store kept entirely in memory (tests and embedding).
#[derive(Default)]
pub struct InMemoryStore {
    documents: RwLock<HashMap<Document, Map<String, Value>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn load(&self, document: Document) -> Result<Map<String, Value>, SmileError> {
        let documents = self.documents.read().await;
        let stored = documents.get(&document).cloned().unwrap_or_default();
        Ok(document.merge_with_defaults(stored))
    }

    async fn save(&self, document: Document, content: &Map<String, Value>) -> Result<(), SmileError> {
        self.documents.write().await.insert(document, content.clone());
        Ok(())
    }
}

pub async fn load_prompts(store: &dyn DocumentStore) -> Result<PromptSet, SmileError> {
    let map = store.load(Document::Prompts).await?;
    from_map(Document::Prompts, map)
}

pub async fn save_prompts(store: &dyn DocumentStore, prompts: &PromptSet) -> Result<(), SmileError> {
    store.save(Document::Prompts, &to_map(prompts)?).await
}

pub async fn load_state(store: &dyn DocumentStore) -> Result<EvaluationState, SmileError> {
    let map = store.load(Document::State).await?;
    from_map(Document::State, map)
}

pub async fn save_state(store: &dyn DocumentStore, state: &EvaluationState) -> Result<(), SmileError> {
    store.save(Document::State, &to_map(state)?).await
}

fn from_map<T: serde::de::DeserializeOwned>(
    document: Document,
    map: Map<String, Value>,
) -> Result<T, SmileError> {
    serde_json::from_value(Value::Object(map)).map_err(|source| SmileError::MalformedDocument {
        document: document.to_string(),
        source,
    })
}

fn to_map<T: serde::Serialize>(value: &T) -> Result<Map<String, Value>, SmileError> {
    match serde_json::to_value(value).map_err(anyhow::Error::from)? {
        Value::Object(map) => Ok(map),
        _ => Err(SmileError::Storage("document did not serialize to an object".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use smilecheck_core::{now_timestamp, Finding, StructuredFindings};

    fn sample_state() -> EvaluationState {
        EvaluationState {
            last_raw_response: Some("Relatório\n- Problema: x | Gravidade: leve. y\nfim".into()),
            structured_findings: Some(StructuredFindings {
                findings: vec![Finding {
                    issue: "x".into(),
                    severity: "leve".into(),
                    recommendation: "y".into(),
                }],
                summary: "fim".into(),
            }),
            original_image_path: Some("uploads/0123456789abcdef_smile.png".into()),
            corrected_image_path: None,
            updated_at: Some(now_timestamp()),
        }
    }

    #[tokio::test]
    async fn empty_store_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        assert_eq!(load_prompts(&store).await.unwrap(), PromptSet::default());
        assert_eq!(load_state(&store).await.unwrap(), EvaluationState::default());
        assert_eq!(store.load(Document::State).await.unwrap(), Document::State.defaults());
    }

    #[tokio::test]
    async fn typed_documents_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data"));

        let prompts = PromptSet::new("check teeth", "whiten");
        save_prompts(&store, &prompts).await.unwrap();
        assert_eq!(load_prompts(&store).await.unwrap(), prompts);

        let state = sample_state();
        save_state(&store, &state).await.unwrap();
        assert_eq!(load_state(&store).await.unwrap(), state);
    }

    #[tokio::test]
    async fn save_replaces_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        let first = json!({ "analysis_prompt": "a", "extra": true });
        store.save(Document::Prompts, first.as_object().unwrap()).await.unwrap();
        let second = json!({ "enhancement_prompt": "b" });
        store.save(Document::Prompts, second.as_object().unwrap()).await.unwrap();

        let loaded = store.load(Document::Prompts).await.unwrap();
        assert_eq!(loaded["analysis_prompt"], "");
        assert_eq!(loaded["enhancement_prompt"], "b");
        assert!(loaded.get("extra").is_none());
    }

    #[tokio::test]
    async fn malformed_json_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        std::fs::write(store.document_path(Document::State), "{ not json").unwrap();

        let err = load_state(&store).await.unwrap_err();
        assert!(matches!(err, SmileError::MalformedDocument { .. }));
    }

    #[tokio::test]
    async fn in_memory_store_merges_defaults() {
        let store = InMemoryStore::new();
        let partial = json!({ "original_image": "uploads/x.png" });
        store.save(Document::State, partial.as_object().unwrap()).await.unwrap();

        let state = load_state(&store).await.unwrap();
        assert_eq!(state.original_image_path.as_deref(), Some("uploads/x.png"));
        assert_eq!(state.last_raw_response, None);
    }
}
