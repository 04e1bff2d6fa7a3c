use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use trainer_core::model::{
    Book, BookId, MilestoneId, MilestoneLadder, MilestoneRecord, Note, Pet, PetId, ReadingStatus,
    SessionId, Subject, TrainingSession,
};
use trainer_core::stats::total_hours;

use crate::error::BackendError;
use crate::records::{
    CreatedSession, DashboardRecord, GoalDraft, GoalRecord, NewPet, NewSession, SessionChanges,
    StatsRecord, SummaryRecord,
};
use crate::repository::TrainerBackend;

const DEFAULT_TARGET_HOURS: f64 = 300.0;

#[derive(Default)]
struct MemoryState {
    sessions: Vec<TrainingSession>,
    notes: Vec<Note>,
    pets: Vec<Pet>,
    // Never pruned, even when an edit lowers the total.
    milestones: Vec<MilestoneRecord>,
    dashboard: DashboardRecord,
    summary: SummaryRecord,
    stats: StatsRecord,
    goal: Option<GoalRecord>,
    default_books: Vec<Book>,
    my_books: Vec<Book>,
    ladder: MilestoneLadder,
}

impl MemoryState {
    /// Record every ladder rung the current total has reached but that has no
    /// record yet, returning the lowest newly recorded one.
    fn record_crossed(&mut self, reached_at: &str) -> Option<MilestoneRecord> {
        let total = total_hours(&self.sessions);
        let mut first = None;
        for milestone in self.ladder.milestones() {
            let recorded = self
                .milestones
                .iter()
                .any(|m| m.hours_reached == milestone.threshold);
            if recorded || total < f64::from(milestone.threshold) {
                continue;
            }
            let record = MilestoneRecord {
                id: MilestoneId::new(next_id(self.milestones.iter().map(|m| m.id.value()))),
                hours_reached: milestone.threshold,
                reached_at: Some(reached_at.to_string()),
                celebrated: false,
            };
            self.milestones.push(record.clone());
            first.get_or_insert(record);
        }
        first
    }

    fn my_book(&mut self, id: BookId) -> Result<&mut Book, BackendError> {
        self.my_books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(BackendError::NotFound)
    }
}

fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().unwrap_or(0) + 1
}

/// Simple in-memory backend for tests and offline demos.
///
/// Logging or editing a session records any hour milestone the new total crosses, and
/// the dashboard's uncelebrated list always reflects the recorded milestones.
#[derive(Clone)]
pub struct InMemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        let state = MemoryState {
            ladder: MilestoneLadder::default_hours(),
            ..MemoryState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, BackendError> {
        self.state
            .lock()
            .map_err(|e| BackendError::Unavailable(e.to_string()))
    }

    fn seed(self, apply: impl FnOnce(&mut MemoryState)) -> Self {
        if let Ok(mut guard) = self.state.lock() {
            apply(&mut guard);
        }
        self
    }

    #[must_use]
    pub fn with_sessions(self, sessions: Vec<TrainingSession>) -> Self {
        self.seed(|s| s.sessions = sessions)
    }

    #[must_use]
    pub fn with_notes(self, notes: Vec<Note>) -> Self {
        self.seed(|s| s.notes = notes)
    }

    #[must_use]
    pub fn with_pets(self, pets: Vec<Pet>) -> Self {
        self.seed(|s| s.pets = pets)
    }

    #[must_use]
    pub fn with_milestones(self, milestones: Vec<MilestoneRecord>) -> Self {
        self.seed(|s| s.milestones = milestones)
    }

    #[must_use]
    pub fn with_dashboard(self, dashboard: DashboardRecord) -> Self {
        self.seed(|s| s.dashboard = dashboard)
    }

    #[must_use]
    pub fn with_summary(self, summary: SummaryRecord) -> Self {
        self.seed(|s| s.summary = summary)
    }

    #[must_use]
    pub fn with_stats(self, stats: StatsRecord) -> Self {
        self.seed(|s| s.stats = stats)
    }

    #[must_use]
    pub fn with_goal(self, goal: GoalRecord) -> Self {
        self.seed(|s| s.goal = Some(goal))
    }

    #[must_use]
    pub fn with_books(self, default_books: Vec<Book>, my_books: Vec<Book>) -> Self {
        self.seed(|s| {
            s.default_books = default_books;
            s.my_books = my_books;
        })
    }

    #[must_use]
    pub fn with_ladder(self, ladder: MilestoneLadder) -> Self {
        self.seed(|s| s.ladder = ladder)
    }
}

#[async_trait]
impl TrainerBackend for InMemoryBackend {
    async fn list_sessions(&self) -> Result<Vec<TrainingSession>, BackendError> {
        Ok(self.lock()?.sessions.clone())
    }

    async fn list_notes(&self) -> Result<Vec<Note>, BackendError> {
        Ok(self.lock()?.notes.clone())
    }

    async fn list_pets(&self) -> Result<Vec<Pet>, BackendError> {
        Ok(self.lock()?.pets.clone())
    }

    async fn list_milestones(&self) -> Result<Vec<MilestoneRecord>, BackendError> {
        Ok(self.lock()?.milestones.clone())
    }

    async fn dashboard(&self) -> Result<DashboardRecord, BackendError> {
        let guard = self.lock()?;
        let mut dashboard = guard.dashboard.clone();
        dashboard.uncelebrated_milestones = guard
            .milestones
            .iter()
            .filter(|m| !m.celebrated)
            .cloned()
            .collect();
        Ok(dashboard)
    }

    async fn summary(&self) -> Result<SummaryRecord, BackendError> {
        Ok(self.lock()?.summary)
    }

    async fn stats(&self) -> Result<StatsRecord, BackendError> {
        Ok(self.lock()?.stats.clone())
    }

    async fn certification_goal(&self) -> Result<Option<GoalRecord>, BackendError> {
        Ok(self.lock()?.goal.clone())
    }

    async fn default_books(&self) -> Result<Vec<Book>, BackendError> {
        Ok(self.lock()?.default_books.clone())
    }

    async fn my_books(&self) -> Result<Vec<Book>, BackendError> {
        Ok(self.lock()?.my_books.clone())
    }

    async fn create_session(&self, new: &NewSession) -> Result<CreatedSession, BackendError> {
        let mut guard = self.lock()?;
        let state = &mut *guard;

        let id = next_id(state.sessions.iter().map(|s| s.id().value()));
        let pet_name = new
            .pet_id
            .and_then(|id| state.pets.iter().find(|p| p.id == id))
            .map(|p| p.name.as_str());
        let session = TrainingSession::new(
            SessionId::new(id),
            new.session_date.format("%Y-%m-%d").to_string(),
            Subject::from_name(pet_name),
            new.pet_id,
            new.duration_minutes,
            new.focus.clone(),
        )?;
        state.sessions.push(session.clone());

        let new_milestone = state.record_crossed(session.date());

        Ok(CreatedSession {
            session,
            new_milestone,
        })
    }

    async fn mark_milestone_celebrated(&self, id: MilestoneId) -> Result<(), BackendError> {
        let mut guard = self.lock()?;
        let milestone = guard
            .milestones
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(BackendError::NotFound)?;
        milestone.celebrated = true;
        Ok(())
    }

    async fn update_session(
        &self,
        id: SessionId,
        changes: &SessionChanges,
    ) -> Result<TrainingSession, BackendError> {
        let mut guard = self.lock()?;
        let state = &mut *guard;

        let index = state
            .sessions
            .iter()
            .position(|s| s.id() == id)
            .ok_or(BackendError::NotFound)?;
        let current = &state.sessions[index];
        let updated = TrainingSession::new(
            id,
            changes.session_date.map_or_else(
                || current.date().to_string(),
                |date| date.format("%Y-%m-%d").to_string(),
            ),
            current.subject().clone(),
            current.pet_id(),
            changes
                .duration_minutes
                .unwrap_or_else(|| current.duration_minutes()),
            changes
                .focus
                .clone()
                .unwrap_or_else(|| current.focus().clone()),
        )?;
        state.sessions[index] = updated.clone();
        state.record_crossed(updated.date());
        Ok(updated)
    }

    async fn add_book_to_list(&self, id: BookId) -> Result<Book, BackendError> {
        let mut guard = self.lock()?;
        let state = &mut *guard;

        let source = state
            .default_books
            .iter()
            .find(|b| b.id == id)
            .ok_or(BackendError::NotFound)?;
        let mut book = source.clone().with_status(ReadingStatus::NotStarted);
        book.id = BookId::new(next_id(state.my_books.iter().map(|b| b.id.value())));
        state.my_books.push(book.clone());
        Ok(book)
    }

    async fn update_book_status(
        &self,
        id: BookId,
        status: ReadingStatus,
    ) -> Result<Book, BackendError> {
        let mut guard = self.lock()?;
        let book = guard.my_book(id)?;
        book.status = status;
        Ok(book.clone())
    }

    async fn remove_book(&self, id: BookId) -> Result<(), BackendError> {
        let mut guard = self.lock()?;
        let before = guard.my_books.len();
        guard.my_books.retain(|b| b.id != id);
        if guard.my_books.len() == before {
            return Err(BackendError::NotFound);
        }
        Ok(())
    }

    async fn create_pet(&self, new: &NewPet) -> Result<Pet, BackendError> {
        let mut guard = self.lock()?;
        let id = PetId::new(next_id(guard.pets.iter().map(|p| p.id.value())));
        let pet = Pet {
            birthdate: new.birthdate,
            sex: new.sex.clone(),
            spayed_neutered: new.spayed_neutered,
            behavioral_notes: new.behavioral_notes.clone(),
            allergies: new.allergies.clone(),
            origin_trainer: true,
            ..Pet::new(id, new.name.as_str())
        };
        guard.pets.push(pet.clone());
        Ok(pet)
    }

    async fn set_pet_active(&self, id: PetId, active: bool) -> Result<Pet, BackendError> {
        let mut guard = self.lock()?;
        let pet = guard
            .pets
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(BackendError::NotFound)?;
        pet.active = active;
        Ok(pet.clone())
    }

    async fn create_goal(&self, draft: &GoalDraft) -> Result<GoalRecord, BackendError> {
        let goal = GoalRecord {
            certification_type: draft.certification_type.clone(),
            target_hours: draft.target_hours.unwrap_or(DEFAULT_TARGET_HOURS),
            weekly_goal_hours: draft.weekly_goal_hours,
            target_completion_date: draft
                .target_completion_date
                .map(|date| date.format("%Y-%m-%d").to_string()),
            hours_per_week_needed: None,
            projected_completion: None,
        };
        self.lock()?.goal = Some(goal.clone());
        Ok(goal)
    }

    async fn update_goal(&self, draft: &GoalDraft) -> Result<GoalRecord, BackendError> {
        let mut guard = self.lock()?;
        let goal = guard.goal.as_mut().ok_or(BackendError::NotFound)?;
        goal.certification_type.clone_from(&draft.certification_type);
        if let Some(target) = draft.target_hours {
            goal.target_hours = target;
        }
        goal.weekly_goal_hours = draft.weekly_goal_hours;
        if let Some(date) = draft.target_completion_date {
            goal.target_completion_date = Some(date.format("%Y-%m-%d").to_string());
        }
        Ok(goal.clone())
    }
}
