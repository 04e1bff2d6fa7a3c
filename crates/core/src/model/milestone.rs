use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::MilestoneId;

/// A milestone the backend has recorded as reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneRecord {
    pub id: MilestoneId,
    pub hours_reached: u32,
    pub reached_at: Option<String>,
    pub celebrated: bool,
}

/// One rung of a milestone ladder: a threshold plus its display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub threshold: u32,
    pub name: String,
    pub badge: String,
}

impl Milestone {
    #[must_use]
    pub fn new(threshold: u32, name: impl Into<String>, badge: impl Into<String>) -> Self {
        Self {
            threshold,
            name: name.into(),
            badge: badge.into(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LadderError {
    #[error("milestone thresholds must be positive")]
    ZeroThreshold,

    #[error("milestone thresholds must ascend: {next} follows {previous}")]
    NotAscending { previous: u32, next: u32 },
}

/// Strictly ascending, positive milestone thresholds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MilestoneLadder(Vec<Milestone>);

impl MilestoneLadder {
    /// Build a ladder from caller-supplied milestones.
    ///
    /// # Errors
    ///
    /// Returns `LadderError::ZeroThreshold` for a zero threshold and
    /// `LadderError::NotAscending` when thresholds are not strictly increasing.
    pub fn new(milestones: Vec<Milestone>) -> Result<Self, LadderError> {
        let mut previous: Option<u32> = None;
        for milestone in &milestones {
            if milestone.threshold == 0 {
                return Err(LadderError::ZeroThreshold);
            }
            if let Some(previous) = previous {
                if milestone.threshold <= previous {
                    return Err(LadderError::NotAscending {
                        previous,
                        next: milestone.threshold,
                    });
                }
            }
            previous = Some(milestone.threshold);
        }
        Ok(Self(milestones))
    }

    /// Build a ladder from bare thresholds, naming each rung after its value.
    ///
    /// # Errors
    ///
    /// Same as [`MilestoneLadder::new`].
    pub fn from_thresholds(thresholds: &[u32], unit: &str) -> Result<Self, LadderError> {
        Self::new(
            thresholds
                .iter()
                .map(|&t| Milestone::new(t, format!("{t} {unit}"), ""))
                .collect(),
        )
    }

    /// The certification hour milestones the app ships with.
    #[must_use]
    pub fn default_hours() -> Self {
        Self(vec![
            Milestone::new(50, "50 Hours", "🏆"),
            Milestone::new(100, "100 Hours", "🎯"),
            Milestone::new(150, "150 Hours", "⭐"),
            Milestone::new(200, "200 Hours", "💎"),
            Milestone::new(250, "250 Hours", "🚀"),
            Milestone::new(300, "300 Hours", "👑"),
        ])
    }

    /// Reading milestones, counted in books read.
    #[must_use]
    pub fn default_books() -> Self {
        Self(vec![
            Milestone::new(5, "5 Books", "📚"),
            Milestone::new(10, "10 Books", "📖"),
            Milestone::new(15, "15 Books", "🎓"),
            Milestone::new(25, "25 Books", "🧠"),
            Milestone::new(50, "50 Books", "🏅"),
        ])
    }

    #[must_use]
    pub fn milestones(&self) -> &[Milestone] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for MilestoneLadder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let milestones = Vec::<Milestone>::deserialize(deserializer)?;
        Self::new(milestones).map_err(serde::de::Error::custom)
    }
}
