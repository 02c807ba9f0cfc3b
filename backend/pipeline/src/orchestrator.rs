//! Upload orchestration: store → analyze → structure → enhance → persist.

use std::sync::Arc;

use anyhow::Context;
use smilecheck_core::{
    AnalysisProvider, EnhancementProvider, EvaluationState, ImageRef, Notice, SmileError,
    StageOutcome, now_timestamp,
};
use smilecheck_store::{DocumentStore, load_prompts, save_state};
use smilecheck_understanding::structure_response;
use tokio::fs;
use tracing::{info, instrument, warn};

use crate::layout::StaticLayout;
use crate::upload::{UploadedFile, generate_token, storage_name};

pub const MISSING_FILE_MESSAGE: &str = "Envie uma imagem antes de processar.";
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Avaliação concluída com sucesso!";

/// Result of a completed upload.
#[derive(Debug, Clone)]
pub struct UploadReport {
    /// The state record that was persisted.
    pub state: EvaluationState,
    /// Notices for the user, in display order.
    pub notices: Vec<Notice>,
    /// `<token>_<name>` under which the upload was stored.
    pub storage_name: String,
}

/// Runs the evaluation pipeline against injected stage providers and store.
pub struct EvaluationPipeline {
    store: Arc<dyn DocumentStore>,
    analyzer: Arc<dyn AnalysisProvider>,
    enhancer: Arc<dyn EnhancementProvider>,
    layout: StaticLayout,
}

impl EvaluationPipeline {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        analyzer: Arc<dyn AnalysisProvider>,
        enhancer: Arc<dyn EnhancementProvider>,
        layout: StaticLayout,
    ) -> Self {
        info!(
            analyzer = analyzer.name(),
            enhancer = enhancer.name(),
            static_root = %layout.root().display(),
            "Evaluation pipeline ready"
        );
        Self { store, analyzer, enhancer, layout }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn layout(&self) -> &StaticLayout {
        &self.layout
    }

    /// Process one upload and persist the new evaluation state.
    ///
    /// A missing file is a [`SmileError::Validation`] and changes nothing.
    /// An enhancement failure is reported in the notices and leaves
    /// `corrected_image_path` empty. Any other failure aborts before the
    /// state is saved.
    #[instrument(skip_all)]
    pub async fn handle_upload(
        &self,
        upload: Option<UploadedFile>,
    ) -> Result<UploadReport, SmileError> {
        let Some(upload) = upload.filter(UploadedFile::is_present) else {
            return Err(SmileError::Validation(MISSING_FILE_MESSAGE.to_string()));
        };

        let name = storage_name(&generate_token(), &upload);
        let upload_path = self.layout.upload_path(&name);
        fs::create_dir_all(self.layout.uploads_dir())
            .await
            .context("Failed to create uploads directory")?;
        fs::write(&upload_path, &upload.bytes)
            .await
            .with_context(|| format!("Failed to store upload: {}", upload_path.display()))?;
        info!(file = %name, bytes = upload.bytes.len(), "Stored upload");

        let prompts = load_prompts(self.store()).await?;

        let image = ImageRef { path: upload_path.clone(), identifier: upload.display_name() };
        let raw_response = self.analyzer.analyze(&image, &prompts.analysis_prompt).await?;
        let structured = structure_response(&raw_response);
        info!(findings = structured.findings.len(), "Analysis structured");

        let enhancement = self.run_enhancement(&name, &prompts.enhancement_prompt).await?;

        let mut notices = Vec::new();
        if let Some(err) = enhancement.degradation() {
            notices.push(Notice::error(err.to_string()));
        }

        let state = EvaluationState {
            last_raw_response: Some(raw_response),
            structured_findings: Some(structured),
            original_image_path: Some(StaticLayout::upload_ref(&name)),
            corrected_image_path: enhancement.into_value(),
            updated_at: Some(now_timestamp()),
        };
        save_state(self.store(), &state).await?;

        notices.push(Notice::success(UPLOAD_SUCCESS_MESSAGE));
        Ok(UploadReport { state, notices, storage_name: name })
    }

    /// Enhance the stored upload; yields the state reference on success.
    async fn run_enhancement(
        &self,
        storage_name: &str,
        instructions: &str,
    ) -> Result<StageOutcome<String>, SmileError> {
        let source = self.layout.upload_path(storage_name);
        let output = self.layout.enhanced_path(storage_name);

        match self.enhancer.enhance(&source, instructions, &output).await {
            Ok(_) => Ok(StageOutcome::Completed(StaticLayout::enhanced_ref(storage_name))),
            Err(err @ SmileError::ImageGeneration(_)) => {
                warn!(error = %err, file = %storage_name, "Enhancement failed; continuing without it");
                Ok(StageOutcome::Degraded(err))
            }
            Err(err) => Err(err),
        }
    }
}
