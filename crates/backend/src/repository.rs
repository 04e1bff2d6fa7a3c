use async_trait::async_trait;

use trainer_core::model::{
    Book, BookId, MilestoneId, MilestoneRecord, Note, Pet, PetId, ReadingStatus, SessionId,
    TrainingSession,
};

use crate::error::BackendError;
use crate::records::{
    CreatedSession, DashboardRecord, GoalDraft, GoalRecord, NewPet, NewSession, SessionChanges,
    StatsRecord, SummaryRecord,
};

/// Contract for the remote trainer backend.
///
/// Every call returns fully loaded, already decoded records; there is no
/// paging or streaming.
#[async_trait]
pub trait TrainerBackend: Send + Sync {
    /// Fetch every logged training session.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport, status or decoding failures.
    async fn list_sessions(&self) -> Result<Vec<TrainingSession>, BackendError>;

    /// Fetch every journal note.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport, status or decoding failures.
    async fn list_notes(&self) -> Result<Vec<Note>, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError` on transport, status or decoding failures.
    async fn list_pets(&self) -> Result<Vec<Pet>, BackendError>;

    /// Milestones the backend has recorded as reached.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport, status or decoding failures.
    async fn list_milestones(&self) -> Result<Vec<MilestoneRecord>, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError` on transport, status or decoding failures.
    async fn dashboard(&self) -> Result<DashboardRecord, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError` on transport, status or decoding failures.
    async fn summary(&self) -> Result<SummaryRecord, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError` on transport, status or decoding failures.
    async fn stats(&self) -> Result<StatsRecord, BackendError>;

    /// The trainer's certification goal, if one was set.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport, status or decoding failures.
    async fn certification_goal(&self) -> Result<Option<GoalRecord>, BackendError>;

    /// Recommended reading.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport, status or decoding failures.
    async fn default_books(&self) -> Result<Vec<Book>, BackendError>;

    /// The trainer's own reading list.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport, status or decoding failures.
    async fn my_books(&self) -> Result<Vec<Book>, BackendError>;

    /// Log a new session. The backend reports any milestone it crossed.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Status` when the backend rejects the session.
    async fn create_session(&self, session: &NewSession) -> Result<CreatedSession, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the milestone does not exist.
    async fn mark_milestone_celebrated(&self, id: MilestoneId) -> Result<(), BackendError>;

    /// Edit a logged session. Milestones already recorded stay recorded even
    /// when the edit lowers the total.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` for an unknown session and
    /// `BackendError::Status` when the backend rejects the change.
    async fn update_session(
        &self,
        id: SessionId,
        changes: &SessionChanges,
    ) -> Result<TrainingSession, BackendError>;

    /// Copy a recommended book onto the trainer's list.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the recommendation does not exist.
    async fn add_book_to_list(&self, id: BookId) -> Result<Book, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the book is not on the list.
    async fn update_book_status(
        &self,
        id: BookId,
        status: ReadingStatus,
    ) -> Result<Book, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the book is not on the list.
    async fn remove_book(&self, id: BookId) -> Result<(), BackendError>;

    /// Register a pet; it is marked as created by the trainer.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Status` when the backend rejects the pet.
    async fn create_pet(&self, pet: &NewPet) -> Result<Pet, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` for an unknown pet.
    async fn set_pet_active(&self, id: PetId, active: bool) -> Result<Pet, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError::Status` when the backend rejects the goal.
    async fn create_goal(&self, goal: &GoalDraft) -> Result<GoalRecord, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` when no goal exists yet.
    async fn update_goal(&self, goal: &GoalDraft) -> Result<GoalRecord, BackendError>;
}
