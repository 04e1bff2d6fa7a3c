//! Unified, newest-first activity timeline over sessions and notes.
//!
//! The two record kinds are fetched independently and arrive in no particular
//! order. [`merge`] interprets their timestamps, tags every record with its
//! kind and returns a fresh sequence sorted most recent first. The sort is
//! stable over the concatenation `sessions ++ notes`, so on identical
//! instants sessions precede notes and each list keeps its input order.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::model::{FocusTags, Note, PetId, Subject, TrainingSession};
use crate::time::parse_timestamp;

/// Discriminant of a [`TimelineEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Session,
    Note,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Session => write!(f, "session"),
            Self::Note => write!(f, "note"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TimelineError {
    #[error("{kind} {id} has an invalid timestamp: {raw:?}")]
    InvalidTimestamp {
        kind: EntryKind,
        id: u64,
        raw: String,
    },
}

/// One displayable record on the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineEntry {
    Session {
        at: NaiveDateTime,
        session: TrainingSession,
    },
    Note {
        at: NaiveDateTime,
        note: Note,
    },
}

impl TimelineEntry {
    /// Wrap a session, interpreting its `date`.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::InvalidTimestamp` when the date cannot be read.
    pub fn from_session(session: TrainingSession) -> Result<Self, TimelineError> {
        let at = parse_timestamp(session.date()).map_err(|err| TimelineError::InvalidTimestamp {
            kind: EntryKind::Session,
            id: session.id().value(),
            raw: err.raw,
        })?;
        Ok(Self::Session { at, session })
    }

    /// Wrap a note, interpreting its `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::InvalidTimestamp` when the timestamp cannot be read.
    pub fn from_note(note: Note) -> Result<Self, TimelineError> {
        let at = parse_timestamp(&note.created_at).map_err(|err| TimelineError::InvalidTimestamp {
            kind: EntryKind::Note,
            id: note.id.value(),
            raw: err.raw,
        })?;
        Ok(Self::Note { at, note })
    }

    /// Chronological sort key.
    #[must_use]
    pub fn at(&self) -> NaiveDateTime {
        match self {
            Self::Session { at, .. } | Self::Note { at, .. } => *at,
        }
    }

    #[must_use]
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Session { .. } => EntryKind::Session,
            Self::Note { .. } => EntryKind::Note,
        }
    }

    /// Name of the animal the entry is about, or the general placeholder.
    #[must_use]
    pub fn subject_name(&self) -> &str {
        match self {
            Self::Session { session, .. } => session.subject().display_name(),
            Self::Note { note, .. } => note
                .pet_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| Subject::General.display_name()),
        }
    }

    #[must_use]
    pub fn focus(&self) -> &FocusTags {
        match self {
            Self::Session { session, .. } => session.focus(),
            Self::Note { note, .. } => &note.focus,
        }
    }

    #[must_use]
    pub fn as_session(&self) -> Option<&TrainingSession> {
        match self {
            Self::Session { session, .. } => Some(session),
            Self::Note { .. } => None,
        }
    }

    #[must_use]
    pub fn as_note(&self) -> Option<&Note> {
        match self {
            Self::Note { note, .. } => Some(note),
            Self::Session { .. } => None,
        }
    }
}

/// Merge sessions and notes into one newest-first sequence.
///
/// Inputs are left untouched. Either list may be empty; both empty yields an
/// empty timeline.
///
/// # Errors
///
/// Returns `TimelineError::InvalidTimestamp` for the first record (sessions
/// first, then notes) whose timestamp cannot be interpreted.
pub fn merge(
    sessions: &[TrainingSession],
    notes: &[Note],
) -> Result<Vec<TimelineEntry>, TimelineError> {
    let mut entries = Vec::with_capacity(sessions.len() + notes.len());
    for session in sessions {
        entries.push(TimelineEntry::from_session(session.clone())?);
    }
    for note in notes {
        entries.push(TimelineEntry::from_note(note.clone())?);
    }
    sort_newest_first(&mut entries);
    Ok(entries)
}

/// Stable newest-first ordering.
pub fn sort_newest_first(entries: &mut [TimelineEntry]) {
    entries.sort_by(|a, b| b.at().cmp(&a.at()));
}

/// True when every entry is at least as recent as the one after it.
#[must_use]
pub fn is_newest_first(entries: &[TimelineEntry]) -> bool {
    entries.windows(2).all(|pair| pair[0].at() >= pair[1].at())
}

//
// ─── SUBJECT FILTERING ─────────────────────────────────────────────────────────
//

/// Sessions that reference the given pet.
#[must_use]
pub fn sessions_for_pet(sessions: &[TrainingSession], pet_id: PetId) -> Vec<TrainingSession> {
    sessions
        .iter()
        .filter(|s| s.pet_id() == Some(pet_id))
        .cloned()
        .collect()
}

/// Notes that reference the given pet.
#[must_use]
pub fn notes_for_pet(notes: &[Note], pet_id: PetId) -> Vec<Note> {
    notes
        .iter()
        .filter(|n| n.pet_id == Some(pet_id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NoteId, SessionId};

    fn session(id: u64, date: &str) -> TrainingSession {
        TrainingSession::new(
            SessionId::new(id),
            date,
            Subject::Named("Biscuit".into()),
            Some(PetId::new(1)),
            60,
            FocusTags::new(),
        )
        .unwrap()
    }

    fn note(id: u64, created_at: &str) -> Note {
        Note::new(NoteId::new(id), created_at, "good day")
    }

    #[test]
    fn newer_note_precedes_older_session() {
        let sessions = vec![session(1, "2024-03-02")];
        let notes = vec![note(7, "2024-03-03")];

        let merged = merge(&sessions, &notes).unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].kind(), EntryKind::Note);
        assert_eq!(merged[0].as_note().unwrap().id, NoteId::new(7));
        assert_eq!(merged[1].kind(), EntryKind::Session);
        assert_eq!(merged[1].as_session().unwrap().id(), SessionId::new(1));
    }

    #[test]
    fn both_empty_yields_empty_timeline() {
        assert!(merge(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn output_is_newest_first_and_complete() {
        let sessions = vec![
            session(1, "2024-01-05T09:00:00"),
            session(2, "2024-02-10"),
            session(3, "2023-12-31T23:59:00Z"),
        ];
        let notes = vec![
            note(1, "2024-01-20T18:30:00.000Z"),
            note(2, "2024-02-11 07:00"),
        ];

        let merged = merge(&sessions, &notes).unwrap();

        assert_eq!(merged.len(), sessions.len() + notes.len());
        assert!(is_newest_first(&merged));
        assert_eq!(merged[0].as_note().unwrap().id, NoteId::new(2));
        assert_eq!(merged[4].as_session().unwrap().id(), SessionId::new(3));
    }

    #[test]
    fn ties_put_sessions_before_notes_and_keep_input_order() {
        let sessions = vec![session(1, "2024-03-02"), session(2, "2024-03-02T00:00:00")];
        let notes = vec![note(9, "2024-03-02"), note(8, "2024-03-02")];

        let merged = merge(&sessions, &notes).unwrap();
        let order: Vec<(EntryKind, u64)> = merged
            .iter()
            .map(|entry| match entry {
                TimelineEntry::Session { session, .. } => (EntryKind::Session, session.id().value()),
                TimelineEntry::Note { note, .. } => (EntryKind::Note, note.id.value()),
            })
            .collect();

        assert_eq!(
            order,
            vec![
                (EntryKind::Session, 1),
                (EntryKind::Session, 2),
                (EntryKind::Note, 9),
                (EntryKind::Note, 8),
            ]
        );
    }

    #[test]
    fn resorting_merged_output_is_a_no_op() {
        let sessions = vec![session(1, "2024-03-02"), session(2, "2024-03-04")];
        let notes = vec![note(1, "2024-03-03"), note(2, "2024-03-04")];

        let merged = merge(&sessions, &notes).unwrap();
        let mut resorted = merged.clone();
        sort_newest_first(&mut resorted);

        assert_eq!(merged, resorted);
    }

    #[test]
    fn inputs_are_not_mutated() {
        let sessions = vec![session(1, "2024-03-01"), session(2, "2024-03-04")];
        let notes = vec![note(1, "2024-03-03")];
        let before = sessions.clone();

        let _ = merge(&sessions, &notes).unwrap();

        assert_eq!(sessions, before);
    }

    #[test]
    fn mixed_offsets_order_by_instant() {
        let notes = vec![
            note(1, "2024-06-10T10:00:00-05:00"),
            note(2, "2024-06-10T12:00:00Z"),
        ];

        let merged = merge(&[], &notes).unwrap();
        let ids: Vec<NoteId> = merged.iter().filter_map(|e| e.as_note()).map(|n| n.id).collect();

        assert_eq!(ids, vec![NoteId::new(1), NoteId::new(2)]);
    }

    #[test]
    fn unparseable_timestamp_fails_instead_of_sorting() {
        let sessions = vec![session(1, "2024-03-02")];
        let notes = vec![note(4, "last tuesday")];

        let err = merge(&sessions, &notes).unwrap_err();

        assert_eq!(
            err,
            TimelineError::InvalidTimestamp {
                kind: EntryKind::Note,
                id: 4,
                raw: "last tuesday".into(),
            }
        );
    }

    #[test]
    fn note_subject_falls_back_to_general() {
        let entry = TimelineEntry::from_note(note(1, "2024-03-03")).unwrap();
        assert_eq!(entry.subject_name(), "General");

        let entry = TimelineEntry::from_note(
            note(2, "2024-03-03").for_pet(PetId::new(1), Some("Biscuit".into())),
        )
        .unwrap();
        assert_eq!(entry.subject_name(), "Biscuit");
    }

    #[test]
    fn pet_filters_match_weak_references_only() {
        let other = TrainingSession::new(
            SessionId::new(5),
            "2024-03-02",
            Subject::General,
            None,
            30,
            FocusTags::new(),
        )
        .unwrap();
        let sessions = vec![session(1, "2024-03-02"), other];
        let notes = vec![
            note(1, "2024-03-03").for_pet(PetId::new(1), None),
            note(2, "2024-03-03").for_pet(PetId::new(2), None),
        ];

        assert_eq!(sessions_for_pet(&sessions, PetId::new(1)).len(), 1);
        let pet_notes = notes_for_pet(&notes, PetId::new(2));
        assert_eq!(pet_notes.len(), 1);
        assert_eq!(pet_notes[0].id, NoteId::new(2));
    }
}
