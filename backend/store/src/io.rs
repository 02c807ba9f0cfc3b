//! JSON document read/write with atomic replace.

use anyhow::Context;
use serde_json::{Map, Value};
use smilecheck_core::SmileError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Random bytes in a temp file name.
const TEMP_SUFFIX_BYTES: usize = 8;

/// Read a JSON object from disk.
///
/// Returns `Ok(None)` if the file doesn't exist. Malformed JSON, or a
/// top-level value that is not an object, is an error.
pub async fn read_json(path: &Path, document: &str) -> Result<Option<Map<String, Value>>, SmileError> {
    if !fs::try_exists(path).await? {
        debug!(path = %path.display(), "Document does not exist; using defaults");
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read document: {}", path.display()))?;

    let value: Value = serde_json::from_str(&raw).map_err(|source| SmileError::MalformedDocument {
        document: document.to_string(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(Some(map)),
        other => Err(SmileError::Storage(format!(
            "{document} document must be a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

/// Write a JSON object to disk, replacing any previous content.
///
/// Serialized with two-space indentation; non-ASCII text is kept verbatim.
/// The content goes to a temp file unique to this call and is renamed into
/// place, so concurrent writers never share a temp file and the last rename
/// wins.
pub async fn write_json(path: &Path, content: &Map<String, Value>) -> Result<(), SmileError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.with_context(|| {
            format!("Failed to create data directory: {}", parent.display())
        })?;
    }

    let json = serde_json::to_string_pretty(content).context("Failed to serialize document")?;

    let tmp_path = temp_path_for(path);
    if let Err(err) = fs::write(&tmp_path, json.as_bytes()).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(anyhow::Error::new(err)
            .context(format!("Failed to write temp document: {}", tmp_path.display()))
            .into());
    }

    if let Err(err) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(anyhow::Error::new(err)
            .context(format!("Failed to rename temp document to: {}", path.display()))
            .into());
    }

    debug!(path = %path.display(), bytes = json.len(), "Wrote document");
    Ok(())
}

/// `.<file name>.<random hex>.tmp` next to `path`.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = hex::encode(rand::random::<[u8; TEMP_SUFFIX_BYTES]>());
    path.with_file_name(format!(".{name}.{suffix}.tmp"))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
