//! Progress derivation shared by every view that shows hours against a goal.
//!
//! All percentages are clamped to `0..=100`; hours past the goal are reported
//! as `hours_over`, never as a percentage above 100.

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::model::{Milestone, MilestoneLadder, MilestoneRecord};

#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("target hours must be a positive number, got {target}")]
    InvalidTarget { target: f64 },

    #[error("weekly goal must be a positive number, got {goal}")]
    InvalidGoal { goal: f64 },

    #[error("hour totals must be finite and non-negative, got {total}")]
    InvalidTotal { total: f64 },
}

/// Percent of goal and hours left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub percentage: f64,
    pub hours_remaining: f64,
    pub hours_over: f64,
}

/// Compute progress towards a certification target.
///
/// # Errors
///
/// Returns `ProgressError::InvalidTarget` when `target_hours` is not a positive
/// finite number and `ProgressError::InvalidTotal` when `total_hours` is
/// negative or not finite.
pub fn compute_progress(total_hours: f64, target_hours: f64) -> Result<Progress, ProgressError> {
    if !target_hours.is_finite() || target_hours <= 0.0 {
        return Err(ProgressError::InvalidTarget {
            target: target_hours,
        });
    }
    check_total(total_hours)?;

    Ok(Progress {
        percentage: clamp_percentage(total_hours / target_hours * 100.0),
        hours_remaining: (target_hours - total_hours).max(0.0),
        hours_over: (total_hours - target_hours).max(0.0),
    })
}

/// Progress within the current week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeeklyProgress {
    pub percentage: f64,
    pub achieved: bool,
}

impl WeeklyProgress {
    /// "Goal achieved!" once the goal is met, else the rounded percent.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn status_text(&self) -> String {
        if self.achieved {
            "Goal achieved!".to_string()
        } else {
            format!("{}% complete", self.percentage.round() as u32)
        }
    }
}

/// Compute progress towards the weekly goal.
///
/// # Errors
///
/// Returns `ProgressError::InvalidGoal` when `week_goal` is not a positive
/// finite number and `ProgressError::InvalidTotal` for a bad `week_hours`.
pub fn compute_weekly_progress(
    week_hours: f64,
    week_goal: f64,
) -> Result<WeeklyProgress, ProgressError> {
    if !week_goal.is_finite() || week_goal <= 0.0 {
        return Err(ProgressError::InvalidGoal { goal: week_goal });
    }
    check_total(week_hours)?;

    let percentage = clamp_percentage(week_hours / week_goal * 100.0);
    Ok(WeeklyProgress {
        percentage,
        achieved: percentage >= 100.0,
    })
}

fn check_total(total: f64) -> Result<(), ProgressError> {
    if !total.is_finite() || total < 0.0 {
        return Err(ProgressError::InvalidTotal { total });
    }
    Ok(())
}

fn clamp_percentage(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

//
// ─── MILESTONES ────────────────────────────────────────────────────────────────
//

/// Thresholds the backend has recorded as reached.
pub type ReachedSet = BTreeSet<u32>;

/// Collect the reached thresholds out of backend milestone records.
#[must_use]
pub fn reached_from_records(records: &[MilestoneRecord]) -> ReachedSet {
    records.iter().map(|r| r.hours_reached).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestoneState {
    pub milestone: Milestone,
    pub unlocked: bool,
}

/// Unlock state for every rung of `ladder`, in ladder order.
///
/// A rung is unlocked when the live total has reached it or, when a recorded
/// `reached` set is supplied, when the backend recorded it. Recorded rungs stay
/// unlocked even after the live total drops below them.
#[must_use]
pub fn compute_milestone_states(
    total: f64,
    ladder: &MilestoneLadder,
    reached: Option<&ReachedSet>,
) -> Vec<MilestoneState> {
    ladder
        .milestones()
        .iter()
        .map(|milestone| {
            let recorded = reached.is_some_and(|set| set.contains(&milestone.threshold));
            let live = total >= f64::from(milestone.threshold);
            MilestoneState {
                milestone: milestone.clone(),
                unlocked: recorded || live,
            }
        })
        .collect()
}

/// First rung that is still locked.
///
/// Reads the computed states so a recorded rung above the live total is never
/// offered as the next goal while also shown as unlocked.
#[must_use]
pub fn next_milestone(states: &[MilestoneState]) -> Option<&Milestone> {
    states.iter().find(|s| !s.unlocked).map(|s| &s.milestone)
}

//
// ─── CLASSIFICATION ────────────────────────────────────────────────────────────
//

/// Trainer rank derived from total hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrainerLevel {
    Novice,
    Apprentice,
    Advanced,
    Master,
}

impl TrainerLevel {
    #[must_use]
    pub fn from_hours(total_hours: f64) -> Self {
        if total_hours < 50.0 {
            Self::Novice
        } else if total_hours < 150.0 {
            Self::Apprentice
        } else if total_hours < 250.0 {
            Self::Advanced
        } else {
            Self::Master
        }
    }
}

impl std::fmt::Display for TrainerLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Novice => "Novice",
            Self::Apprentice => "Apprentice",
            Self::Advanced => "Advanced",
            Self::Master => "Master",
        };
        write!(f, "{label}")
    }
}

/// Coarse band of a progress percentage, used to theme the progress ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProgressTier {
    Starting,
    Building,
    Halfway,
    FinalStretch,
    Complete,
}

impl ProgressTier {
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 100.0 {
            Self::Complete
        } else if percentage >= 83.0 {
            Self::FinalStretch
        } else if percentage >= 50.0 {
            Self::Halfway
        } else if percentage >= 17.0 {
            Self::Building
        } else {
            Self::Starting
        }
    }
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Streak counters as computed by the backend. Opaque to this crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streaks {
    pub current_days: u32,
    pub longest_days: u32,
}

/// Everything a dashboard or profile needs about overall progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub total_hours: f64,
    pub target_hours: f64,
    pub progress: Progress,
    pub tier: ProgressTier,
    pub level: TrainerLevel,
    pub streaks: Streaks,
    pub milestones: Vec<MilestoneState>,
}

impl ProgressSnapshot {
    /// Derive a snapshot from raw totals.
    ///
    /// # Errors
    ///
    /// Propagates `compute_progress` errors.
    pub fn build(
        total_hours: f64,
        target_hours: f64,
        streaks: Streaks,
        ladder: &MilestoneLadder,
        reached: Option<&ReachedSet>,
    ) -> Result<Self, ProgressError> {
        let progress = compute_progress(total_hours, target_hours)?;
        Ok(Self {
            total_hours,
            target_hours,
            progress,
            tier: ProgressTier::from_percentage(progress.percentage),
            level: TrainerLevel::from_hours(total_hours),
            streaks,
            milestones: compute_milestone_states(total_hours, ladder, reached),
        })
    }

    #[must_use]
    pub fn next_milestone(&self) -> Option<&Milestone> {
        next_milestone(&self.milestones)
    }

    #[must_use]
    pub fn unlocked_count(&self) -> usize {
        self.milestones.iter().filter(|m| m.unlocked).count()
    }
}
