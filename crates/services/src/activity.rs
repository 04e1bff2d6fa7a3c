use std::sync::Arc;

use backend::TrainerBackend;
use trainer_core::model::{PetId, Subject};
use trainer_core::stats::total_hours;
use trainer_core::timeline::{notes_for_pet, sessions_for_pet};
use trainer_core::{TimelineEntry, merge};

use crate::error::ServiceError;

/// One pet's combined history.
#[derive(Debug, Clone, PartialEq)]
pub struct PetActivityView {
    pub pet_id: PetId,
    pub session_count: usize,
    pub note_count: usize,
    pub total_hours: f64,
    pub entries: Vec<TimelineEntry>,
}

impl PetActivityView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone)]
pub struct ActivityService {
    backend: Arc<dyn TrainerBackend>,
}

impl ActivityService {
    #[must_use]
    pub fn new(backend: Arc<dyn TrainerBackend>) -> Self {
        Self { backend }
    }

    /// Sessions and notes for one pet, merged newest first.
    ///
    /// Sessions the backend sent without a subject take `pet_name` when one
    /// is given, so the timeline reads by dog rather than "General".
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Backend` when either list fails to load and
    /// `ServiceError::Timeline` when an entry carries an unreadable timestamp.
    pub async fn pet_activity(
        &self,
        pet_id: PetId,
        pet_name: Option<&str>,
    ) -> Result<PetActivityView, ServiceError> {
        let (sessions, notes) =
            tokio::try_join!(self.backend.list_sessions(), self.backend.list_notes())?;

        let fallback = Subject::from_name(pet_name);
        let sessions: Vec<_> = sessions_for_pet(&sessions, pet_id)
            .into_iter()
            .map(|s| {
                if s.subject().is_general() {
                    s.with_subject(fallback.clone())
                } else {
                    s
                }
            })
            .collect();
        let notes = notes_for_pet(&notes, pet_id);
        let entries = merge(&sessions, &notes)?;

        tracing::debug!(
            %pet_id,
            sessions = sessions.len(),
            notes = notes.len(),
            "pet activity merged"
        );

        Ok(PetActivityView {
            pet_id,
            session_count: sessions.len(),
            note_count: notes.len(),
            total_hours: total_hours(&sessions),
            entries,
        })
    }
}
