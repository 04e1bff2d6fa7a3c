//! Decoded backend aggregates handed to the service layer.
//!
//! These carry raw numbers only. Percentages the backend also sends are
//! dropped on purpose: every derived figure is recomputed through
//! `trainer_core::progress` so all views agree.

use chrono::NaiveDate;
use serde::Serialize;

use trainer_core::Streaks;
use trainer_core::model::{FocusTags, MilestoneRecord, PetId, TrainingSession};
use trainer_core::stats::{MonthlyComparison, WeeklyTrendPoint};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardRecord {
    pub total_hours: f64,
    pub target_hours: f64,
    pub streaks: Streaks,
    pub week_hours: f64,
    pub week_goal: f64,
    pub projected_completion: Option<String>,
    pub recent_sessions: Vec<TrainingSession>,
    pub uncelebrated_milestones: Vec<MilestoneRecord>,
}

impl Default for DashboardRecord {
    fn default() -> Self {
        Self {
            total_hours: 0.0,
            target_hours: 300.0,
            streaks: Streaks::default(),
            week_hours: 0.0,
            week_goal: 5.0,
            projected_completion: None,
            recent_sessions: Vec::new(),
            uncelebrated_milestones: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryRecord {
    pub total_hours: f64,
    pub total_sessions: u32,
    pub streaks: Streaks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsRecord {
    pub total_hours: f64,
    pub total_sessions: u32,
    pub unique_dogs: u32,
    pub average_session_minutes: f64,
    pub breakdown_by_type: Vec<(String, f64)>,
    pub monthly: MonthlyComparison,
    pub weekly_trend: Vec<WeeklyTrendPoint>,
}

impl Default for StatsRecord {
    fn default() -> Self {
        Self {
            total_hours: 0.0,
            total_sessions: 0,
            unique_dogs: 0,
            average_session_minutes: 0.0,
            breakdown_by_type: Vec::new(),
            monthly: MonthlyComparison {
                this_month: 0.0,
                last_month: 0.0,
                change_percentage: 0.0,
            },
            weekly_trend: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalRecord {
    pub certification_type: String,
    pub target_hours: f64,
    pub weekly_goal_hours: f64,
    pub target_completion_date: Option<String>,
    pub hours_per_week_needed: Option<f64>,
    pub projected_completion: Option<String>,
}

/// A session the trainer is logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub pet_id: Option<PetId>,
    pub session_date: NaiveDate,
    pub duration_minutes: u32,
    pub session_type: String,
    pub notes: Option<String>,
    pub focus: FocusTags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSession {
    pub session: TrainingSession,
    pub new_milestone: Option<MilestoneRecord>,
}

/// Fields to change on an existing session; `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionChanges {
    pub session_date: Option<NaiveDate>,
    pub duration_minutes: Option<u32>,
    pub session_type: Option<String>,
    pub notes: Option<String>,
    pub focus: Option<FocusTags>,
}

impl SessionChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A pet registered from this client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPet {
    pub name: String,
    pub birthdate: Option<NaiveDate>,
    pub sex: Option<String>,
    pub spayed_neutered: bool,
    pub behavioral_notes: Option<String>,
    pub allergies: Option<String>,
}

/// Certification goal fields sent on create or update.
///
/// `target_hours` may be omitted on update to keep the stored target.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalDraft {
    pub certification_type: String,
    pub target_hours: Option<f64>,
    pub weekly_goal_hours: f64,
    pub target_completion_date: Option<NaiveDate>,
}
