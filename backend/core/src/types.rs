use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// UTC timestamp stored with second precision (`2026-10-19T12:00:00Z`).
pub type Timestamp = DateTime<Utc>;

/// Current time truncated to whole seconds.
pub fn now_timestamp() -> Timestamp {
    Utc::now().trunc_subsecs(0)
}

/// The two editable instruction strings that drive the pipeline stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSet {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub analysis_prompt: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub enhancement_prompt: String,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl PromptSet {
    /// Build a freshly stamped prompt set from raw form input.
    pub fn new(analysis_prompt: &str, enhancement_prompt: &str) -> Self {
        Self {
            analysis_prompt: analysis_prompt.trim().to_string(),
            enhancement_prompt: enhancement_prompt.trim().to_string(),
            updated_at: Some(now_timestamp()),
        }
    }
}

/// The most recent pipeline result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationState {
    #[serde(default)]
    pub last_raw_response: Option<String>,
    #[serde(default)]
    pub structured_findings: Option<StructuredFindings>,
    /// Path relative to the static root, e.g. `uploads/<token>_smile.png`.
    #[serde(default, rename = "original_image")]
    pub original_image_path: Option<String>,
    /// Path relative to the static root; `None` when enhancement failed.
    #[serde(default, rename = "corrected_image")]
    pub corrected_image_path: Option<String>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredFindings {
    #[serde(default)]
    pub findings: Vec<Finding>,
    #[serde(default)]
    pub summary: String,
}

/// One dental issue parsed out of an analysis report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub issue: String,
    pub severity: String,
    pub recommendation: String,
}

/// Severity of a transient notice shown on the next rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
