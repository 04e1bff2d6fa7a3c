#![forbid(unsafe_code)]

pub mod catalog;
pub mod date_label;
pub mod error;
pub mod model;
pub mod progress;
pub mod stats;
pub mod time;
pub mod timeline;

pub use date_label::DateLabel;
pub use error::Error;
pub use progress::{
    MilestoneState, Progress, ProgressError, ProgressSnapshot, ProgressTier, ReachedSet, Streaks,
    TrainerLevel, WeeklyProgress, compute_milestone_states, compute_progress,
    compute_weekly_progress,
};
pub use time::Clock;
pub use timeline::{EntryKind, TimelineEntry, TimelineError, merge};
