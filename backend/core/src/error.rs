use thiserror::Error;

/// Top-level error type for the SmileCheck pipeline.
///
/// `Validation` and `ImageGeneration` carry user-facing messages and are shown
/// as notices; the remaining variants are fatal for the request.
#[derive(Debug, Error)]
pub enum SmileError {
    #[error("{0}")]
    Validation(String),

    /// The enhancement stage could not produce an image.
    #[error("{0}")]
    ImageGeneration(String),

    #[error("analysis failed: {0}")]
    Analysis(String),

    #[error("malformed {document} document: {source}")]
    MalformedDocument {
        document: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SmileError {
    /// Whether this error should be surfaced as a notice rather than a failed request.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::ImageGeneration(_))
    }
}
