//! Prompt management: read and replace the instruction strings.

use smilecheck_core::{EvaluationState, PromptSet, SmileError};
use smilecheck_store::{load_prompts, load_state, save_prompts};
use tracing::info;

use crate::orchestrator::EvaluationPipeline;

pub const PROMPTS_UPDATED_MESSAGE: &str = "Prompts atualizados.";

impl EvaluationPipeline {
    pub async fn current_prompts(&self) -> Result<PromptSet, SmileError> {
        load_prompts(self.store()).await
    }

    pub async fn current_state(&self) -> Result<EvaluationState, SmileError> {
        load_state(self.store()).await
    }

    /// Trim both prompts, stamp them, and replace the stored prompt set.
    pub async fn update_prompts(
        &self,
        analysis_prompt: &str,
        enhancement_prompt: &str,
    ) -> Result<PromptSet, SmileError> {
        let prompts = PromptSet::new(analysis_prompt, enhancement_prompt);
        save_prompts(self.store(), &prompts).await?;
        info!(
            analysis_chars = prompts.analysis_prompt.chars().count(),
            enhancement_chars = prompts.enhancement_prompt.chars().count(),
            "Prompts updated"
        );
        Ok(prompts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::StaticLayout;
    use smilecheck_media::FilterEnhancer;
    use smilecheck_store::InMemoryStore;
    use smilecheck_understanding::SeededVisionAnalyzer;
    use std::sync::Arc;

    fn pipeline() -> EvaluationPipeline {
        EvaluationPipeline::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(SeededVisionAnalyzer::new()),
            Arc::new(FilterEnhancer::new()),
            StaticLayout::new("static"),
        )
    }

    #[tokio::test]
    async fn update_trims_and_replaces() {
        let pipeline = pipeline();
        assert_eq!(pipeline.current_prompts().await.unwrap(), PromptSet::default());

        pipeline.update_prompts("  check teeth ", " whiten\n").await.unwrap();
        let stored = pipeline.current_prompts().await.unwrap();
        assert_eq!(stored.analysis_prompt, "check teeth");
        assert_eq!(stored.enhancement_prompt, "whiten");
        assert!(stored.updated_at.is_some());

        pipeline.update_prompts("", "").await.unwrap();
        let cleared = pipeline.current_prompts().await.unwrap();
        assert_eq!(cleared.analysis_prompt, "");
        assert_eq!(cleared.enhancement_prompt, "");
    }

    #[tokio::test]
    async fn updating_prompts_leaves_state_alone() {
        let pipeline = pipeline();
        pipeline.update_prompts("a", "b").await.unwrap();
        assert_eq!(pipeline.current_state().await.unwrap(), EvaluationState::default());
    }
}
