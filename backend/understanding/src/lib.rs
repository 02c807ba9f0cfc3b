pub mod structure;
pub mod vision;

pub use structure::structure_response;
pub use vision::{run_analysis, SeededVisionAnalyzer, Severity};
