//! SmileCheck evaluation pipeline.
//!
//! `EvaluationPipeline::handle_upload` stores the photo, runs the analysis
//! provider, structures its report, runs the enhancement provider (allowed
//! to fail), and persists the new evaluation state. Prompt updates go
//! through the same pipeline handle.

pub mod layout;
pub mod orchestrator;
pub mod prompts;
pub mod upload;

pub use layout::StaticLayout;
pub use orchestrator::{EvaluationPipeline, MISSING_FILE_MESSAGE, UPLOAD_SUCCESS_MESSAGE, UploadReport};
pub use prompts::PROMPTS_UPDATED_MESSAGE;
pub use upload::UploadedFile;
