use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{FocusTags, PetId, SessionId};

/// Display name used when a record is not tied to a specific animal.
pub const GENERAL_SUBJECT: &str = "General";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordError {
    #[error("session {id} has a zero duration")]
    ZeroDuration { id: SessionId },
}

/// The animal a record pertains to, or the general placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    #[default]
    General,
    Named(String),
}

impl Subject {
    /// Build a subject from an optional display name; blank names fall back to general.
    #[must_use]
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(str::trim) {
            Some(name) if !name.is_empty() => Self::Named(name.to_string()),
            _ => Self::General,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::General => GENERAL_SUBJECT,
            Self::Named(name) => name,
        }
    }

    #[must_use]
    pub fn is_general(&self) -> bool {
        matches!(self, Self::General)
    }
}

/// One logged training interaction.
///
/// `date` is kept exactly as the backend sent it; it is only interpreted when
/// the session is placed on a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSession {
    id: SessionId,
    date: String,
    subject: Subject,
    pet_id: Option<PetId>,
    duration_minutes: u32,
    focus: FocusTags,
}

impl TrainingSession {
    /// Create a session record.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::ZeroDuration` if `duration_minutes` is zero.
    pub fn new(
        id: SessionId,
        date: impl Into<String>,
        subject: Subject,
        pet_id: Option<PetId>,
        duration_minutes: u32,
        focus: FocusTags,
    ) -> Result<Self, RecordError> {
        if duration_minutes == 0 {
            return Err(RecordError::ZeroDuration { id });
        }
        Ok(Self {
            id,
            date: date.into(),
            subject,
            pet_id,
            duration_minutes,
            focus,
        })
    }

    /// Replace the subject, keeping everything else.
    #[must_use]
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = subject;
        self
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    #[must_use]
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    #[must_use]
    pub fn pet_id(&self) -> Option<PetId> {
        self.pet_id
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Duration in fractional hours.
    #[must_use]
    pub fn hours(&self) -> f64 {
        f64::from(self.duration_minutes) / 60.0
    }

    #[must_use]
    pub fn focus(&self) -> &FocusTags {
        &self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_is_rejected() {
        let err = TrainingSession::new(
            SessionId::new(3),
            "2024-03-02",
            Subject::General,
            None,
            0,
            FocusTags::new(),
        )
        .unwrap_err();

        assert_eq!(err, RecordError::ZeroDuration { id: SessionId::new(3) });
    }

    #[test]
    fn blank_subject_name_falls_back_to_general() {
        assert_eq!(Subject::from_name(Some("  ")), Subject::General);
        assert_eq!(Subject::from_name(None).display_name(), GENERAL_SUBJECT);
        assert_eq!(
            Subject::from_name(Some(" Biscuit ")),
            Subject::Named("Biscuit".into())
        );
    }

    #[test]
    fn hours_are_fractional() {
        let session = TrainingSession::new(
            SessionId::new(1),
            "2024-03-02",
            Subject::Named("Biscuit".into()),
            Some(PetId::new(9)),
            45,
            FocusTags::new(),
        )
        .unwrap();

        assert!((session.hours() - 0.75).abs() < f64::EPSILON);
    }
}
