//! Outcome of a pipeline stage that is allowed to fail without aborting the run.
//!
//! Stages return `Result<StageOutcome<T>, SmileError>`:
//! - `Ok(Completed(value))`: the stage produced its value.
//! - `Ok(Degraded(error))`: the stage failed, the pipeline continues without it.
//! - `Err(error)`: the stage failed fatally and the run is aborted.

use crate::error::SmileError;

#[derive(Debug)]
pub enum StageOutcome<T> {
    Completed(T),
    Degraded(SmileError),
}

impl<T> StageOutcome<T> {
    /// The produced value, if the stage completed.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Degraded(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Degraded(_) => None,
        }
    }

    /// The recoverable error, if the stage degraded.
    pub fn degradation(&self) -> Option<&SmileError> {
        match self {
            Self::Completed(_) => None,
            Self::Degraded(err) => Some(err),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> StageOutcome<U> {
        match self {
            Self::Completed(value) => StageOutcome::Completed(f(value)),
            Self::Degraded(err) => StageOutcome::Degraded(err),
        }
    }
}
