use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// A simple clock abstraction for deterministic "today" in services and tests.
///
/// Times are local wall-clock values; offset-bearing backend timestamps are
/// converted into the local zone when parsed, so everything downstream compares
/// local calendar days.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(NaiveDateTime),
}

impl Clock {
    /// Returns a clock that uses the current local time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given wall-clock time.
    #[must_use]
    pub fn fixed(at: NaiveDateTime) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current wall-clock time according to the clock.
    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Clock::Default => Local::now().naive_local(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Returns the current calendar day according to the clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

//
// ─── TIMESTAMP PARSING ─────────────────────────────────────────────────────────
//

/// A raw timestamp string that could not be read as a point in time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid timestamp: {raw:?}")]
pub struct InvalidTimestamp {
    pub raw: String,
}

const DATE_TIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a backend timestamp into a local wall-clock value.
///
/// RFC 3339 values carry an offset and are converted into the local zone, so
/// two instants compare by when they happened rather than by how they were
/// written. ISO-like date-times without an offset, with or without seconds, are
/// already local. Bare `YYYY-MM-DD` dates read as local midnight.
///
/// # Errors
///
/// Returns `InvalidTimestamp` when none of the accepted shapes match.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, InvalidTimestamp> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidTimestamp { raw: raw.to_owned() });
    }

    if let Ok(at) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(at.with_timezone(&Local).naive_local());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(at) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(at);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| InvalidTimestamp { raw: raw.to_owned() })
}

/// Parse a bare calendar date, as used for birthdates and projections.
///
/// Full timestamps are accepted too and truncated to their day.
///
/// # Errors
///
/// Returns `InvalidTimestamp` when the value cannot be read.
pub fn parse_date(raw: &str) -> Result<NaiveDate, InvalidTimestamp> {
    parse_timestamp(raw).map(|at| at.date())
}

//
// ─── TEST HELPERS ──────────────────────────────────────────────────────────────
//

/// Returns a deterministic wall-clock time for tests and examples (2024-06-15 12:00).
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 15)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .expect("fixed timestamp should be valid")
}

/// Returns the calendar day of [`fixed_now`].
#[must_use]
pub fn fixed_today() -> NaiveDate {
    fixed_now().date()
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        assert_eq!(parse_timestamp("2024-03-02").unwrap(), at(2024, 3, 2, 0, 0));
    }

    #[test]
    fn rfc3339_offsets_resolve_to_the_same_instant() {
        let east_coast = parse_timestamp("2024-03-02T10:30:00.000-05:00").unwrap();
        let utc = parse_timestamp("2024-03-02T15:30:00Z").unwrap();
        assert_eq!(east_coast, utc);

        let expected = DateTime::parse_from_rfc3339("2024-03-02T15:30:00Z")
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(utc, expected);
    }

    #[test]
    fn later_instant_sorts_later_despite_earlier_wall_clock() {
        let later = parse_timestamp("2024-06-10T10:00:00-05:00").unwrap();
        let earlier = parse_timestamp("2024-06-10T12:00:00Z").unwrap();
        assert!(later > earlier);
    }

    #[test]
    fn parses_minutes_precision() {
        assert_eq!(
            parse_timestamp("2024-06-15T08:00").unwrap(),
            at(2024, 6, 15, 8, 0)
        );
        assert_eq!(
            parse_timestamp("2024-06-15 08:00:00").unwrap(),
            at(2024, 6, 15, 8, 0)
        );
    }

    #[test]
    fn rejects_garbage_and_empty() {
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("2024-13-40").is_err());

        let err = parse_timestamp("03/02/2024").unwrap_err();
        assert_eq!(err.raw, "03/02/2024");
    }

    #[test]
    fn fixed_clock_reports_its_day() {
        let clock = fixed_clock();
        assert_eq!(clock.now(), fixed_now());
        assert_eq!(clock.today(), fixed_today());
    }
}
