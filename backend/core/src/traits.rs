use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::SmileError;

/// An uploaded image as seen by the analysis stage.
#[derive(Debug, Clone)]
pub struct ImageRef {
    /// Where the bytes were stored.
    pub path: PathBuf,
    /// Name the generator is seeded with (the client-supplied filename).
    pub identifier: String,
}

/// Produces a free-text report for an image.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Provider name (e.g., "seeded-vision").
    fn name(&self) -> &str;

    /// Analyze the image following `instructions` and return the raw report.
    async fn analyze(&self, image: &ImageRef, instructions: &str) -> Result<String, SmileError>;
}

/// Produces a corrected copy of an image.
///
/// Failures should be reported as [`SmileError::ImageGeneration`]; the
/// pipeline treats them as recoverable.
#[async_trait]
pub trait EnhancementProvider: Send + Sync {
    /// Provider name (e.g., "filter-chain").
    fn name(&self) -> &str;

    /// Write an enhanced version of `source` to `output` and return the output path.
    async fn enhance(
        &self,
        source: &Path,
        instructions: &str,
        output: &Path,
    ) -> Result<PathBuf, SmileError>;
}
