use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::time::{InvalidTimestamp, parse_timestamp};

/// Relative day label for a timestamp, by local calendar day.
///
/// Two events 20 hours apart that straddle midnight land on different labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLabel {
    Today,
    Yesterday,
    /// Any other day, rendered as abbreviated month and day ("Jun 1").
    OnDay(NaiveDate),
}

impl DateLabel {
    #[must_use]
    pub fn classify(at: NaiveDateTime, today: NaiveDate) -> Self {
        let day = at.date();
        if day == today {
            return Self::Today;
        }
        if today.checked_sub_days(Days::new(1)) == Some(day) {
            return Self::Yesterday;
        }
        Self::OnDay(day)
    }

    /// Classify a raw backend timestamp.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTimestamp` when the value cannot be read.
    pub fn from_raw(raw: &str, today: NaiveDate) -> Result<Self, InvalidTimestamp> {
        parse_timestamp(raw).map(|at| Self::classify(at, today))
    }
}

impl std::fmt::Display for DateLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Today => write!(f, "Today"),
            Self::Yesterday => write!(f, "Yesterday"),
            Self::OnDay(day) => write!(f, "{}", day.format("%b %-d")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_today;

    #[test]
    fn labels_follow_calendar_days() {
        let today = fixed_today();

        assert_eq!(
            DateLabel::from_raw("2024-06-15T08:00", today).unwrap().to_string(),
            "Today"
        );
        assert_eq!(
            DateLabel::from_raw("2024-06-14T23:00", today).unwrap().to_string(),
            "Yesterday"
        );
        assert_eq!(
            DateLabel::from_raw("2024-06-01", today).unwrap().to_string(),
            "Jun 1"
        );
    }

    #[test]
    fn crossing_midnight_changes_label_within_a_day() {
        let today = fixed_today();
        let late = DateLabel::from_raw("2024-06-14T03:00", today).unwrap();
        let early = DateLabel::from_raw("2024-06-15T00:30", today).unwrap();

        assert_eq!(late, DateLabel::Yesterday);
        assert_eq!(early, DateLabel::Today);
    }

    #[test]
    fn future_days_get_a_date() {
        let label = DateLabel::from_raw("2024-06-16", fixed_today()).unwrap();
        assert_eq!(label.to_string(), "Jun 16");
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(DateLabel::from_raw("soon", fixed_today()).is_err());
    }
}
