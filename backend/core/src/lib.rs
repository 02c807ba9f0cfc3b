pub mod error;
pub mod outcome;
pub mod traits;
pub mod types;

pub use error::SmileError;
pub use outcome::StageOutcome;
pub use traits::{AnalysisProvider, EnhancementProvider, ImageRef};
pub use types::{
    now_timestamp, EvaluationState, Finding, Notice, NoticeLevel, PromptSet, StructuredFindings,
    Timestamp,
};
