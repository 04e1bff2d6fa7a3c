use thiserror::Error;

use crate::model::{LadderError, RecordError, TagError};
use crate::progress::ProgressError;
use crate::time::InvalidTimestamp;
use crate::timeline::TimelineError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Timeline(#[from] TimelineError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Ladder(#[from] LadderError),
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Tag(#[from] TagError),
    #[error(transparent)]
    Timestamp(#[from] InvalidTimestamp),
}
