//! Shared error types for the services crate.

use thiserror::Error;

use backend::BackendError;
use trainer_core::model::{LadderError, RecordError};
use trainer_core::{ProgressError, TimelineError};

/// Errors emitted while assembling a view.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Timeline(#[from] TimelineError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Ladder(#[from] LadderError),
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("session duration must be at least one minute")]
    EmptySession,
    #[error("nothing to change")]
    NothingToChange,
    #[error("{title:?} is already on the reading list")]
    AlreadyOnList { title: String },
    #[error("a pet needs a name")]
    MissingPetName,
    #[error("invalid weekly goal: {hours} hours")]
    InvalidWeeklyGoal { hours: f64 },
    #[error("invalid target hours: {raw}")]
    InvalidTargetHours { raw: String },
}

impl ServiceError {
    /// True when retrying the same call might succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Backend(err) if err.is_transient())
    }
}
