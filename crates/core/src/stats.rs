//! Hour aggregation and statistics helpers.

use serde::{Deserialize, Serialize};

use crate::model::TrainingSession;

/// Total hours across sessions.
#[must_use]
pub fn total_hours(sessions: &[TrainingSession]) -> f64 {
    let minutes: u64 = sessions
        .iter()
        .map(|s| u64::from(s.duration_minutes()))
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let minutes = minutes as f64;
    minutes / 60.0
}

/// Badge text for a single session's hours, e.g. `+1.5h`.
#[must_use]
pub fn hours_badge(duration_minutes: u32) -> String {
    format!("+{:.1}h", f64::from(duration_minutes) / 60.0)
}

/// One slice of the focus breakdown chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusShare {
    pub key: String,
    pub label: String,
    pub hours: f64,
    /// Rounded share of all focus hours, 0 when there are none.
    pub percent: u32,
}

/// Turn per-type hour totals into rounded shares, keeping input order.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn focus_breakdown(by_type: &[(String, f64)]) -> Vec<FocusShare> {
    let total: f64 = by_type.iter().map(|(_, hours)| hours.max(0.0)).sum();
    by_type
        .iter()
        .map(|(key, hours)| {
            let percent = if total > 0.0 {
                (hours.max(0.0) / total * 100.0).round() as u32
            } else {
                0
            };
            FocusShare {
                key: key.clone(),
                label: humanize_key(key),
                hours: *hours,
                percent,
            }
        })
        .collect()
}

/// `leash_manners` → `Leash Manners`.
#[must_use]
pub fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut at_word_start = true;
    for ch in key.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if at_word_start && ch.is_alphanumeric() {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = !ch.is_alphanumeric();
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Up,
    Down,
}

/// This month against last month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyComparison {
    pub this_month: f64,
    pub last_month: f64,
    pub change_percentage: f64,
}

impl MonthlyComparison {
    /// Flat months count as up.
    #[must_use]
    pub fn trend(&self) -> Trend {
        if self.change_percentage >= 0.0 {
            Trend::Up
        } else {
            Trend::Down
        }
    }

    /// e.g. `↑ 12.5% vs last month`.
    #[must_use]
    pub fn summary(&self) -> String {
        let arrow = match self.trend() {
            Trend::Up => '↑',
            Trend::Down => '↓',
        };
        format!("{arrow} {:.1}% vs last month", self.change_percentage.abs())
    }
}

/// Hours logged in one week of the trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTrendPoint {
    pub week: String,
    pub hours: f64,
}
