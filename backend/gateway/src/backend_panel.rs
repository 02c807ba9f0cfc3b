//! Backend panel: prompt editor and latest raw analysis.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Form;
use serde::Deserialize;
use smilecheck_core::Notice;
use smilecheck_pipeline::PROMPTS_UPDATED_MESSAGE;

use crate::error::ApiError;
use crate::evaluation::html_response;
use crate::flash::has_flash_cookie;
use crate::render;
use crate::server::GatewayState;

/// Missing fields are saved as empty prompts.
#[derive(Debug, Default, Deserialize)]
pub struct PromptForm {
    #[serde(default)]
    pub analysis_prompt: String,
    #[serde(default)]
    pub enhancement_prompt: String,
}

/// GET /backend
pub async fn panel(
    State(state): State<GatewayState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let notices = state.flash.read(&headers);
    let prompts = state.pipeline.current_prompts().await?;
    let evaluation = state.pipeline.current_state().await?;
    Ok(html_response(
        render::backend_page(&prompts, &evaluation, &notices),
        has_flash_cookie(&headers),
    ))
}

/// POST /backend/prompts
pub async fn update_prompts(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Form(form): Form<PromptForm>,
) -> Result<Response, ApiError> {
    state
        .pipeline
        .update_prompts(&form.analysis_prompt, &form.enhancement_prompt)
        .await?;
    Ok(state
        .flash
        .redirect(&headers, "/backend", vec![Notice::success(PROMPTS_UPDATED_MESSAGE)]))
}
