use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use backend::TrainerBackend;
use backend::records::{DashboardRecord, NewSession, SessionChanges};
use trainer_core::model::{
    Milestone, MilestoneId, MilestoneLadder, MilestoneRecord, SessionId, TrainingSession,
};
use trainer_core::progress::reached_from_records;
use trainer_core::time::parse_date;
use trainer_core::{
    ProgressSnapshot, TimelineEntry, WeeklyProgress, compute_weekly_progress, merge,
};

use crate::error::ServiceError;

/// Everything the home screen shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub snapshot: ProgressSnapshot,
    pub week_hours: f64,
    pub week_goal: f64,
    pub weekly: WeeklyProgress,
    pub projected_completion: Option<NaiveDate>,
    /// Most recent sessions, newest first.
    #[serde(skip)]
    pub recent: Vec<TimelineEntry>,
    pub next_milestone: Option<Milestone>,
    /// First recorded milestone the trainer has not celebrated yet.
    pub celebration: Option<MilestoneRecord>,
}

/// Result of logging a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedSession {
    pub session: TrainingSession,
    pub celebration: Option<MilestoneRecord>,
}

/// Presentation-facing dashboard facade.
///
/// Progress figures are always recomputed here from raw totals; the
/// percentages the backend sends alongside are not trusted.
#[derive(Clone)]
pub struct DashboardService {
    backend: Arc<dyn TrainerBackend>,
    ladder: MilestoneLadder,
}

impl DashboardService {
    #[must_use]
    pub fn new(backend: Arc<dyn TrainerBackend>, ladder: MilestoneLadder) -> Self {
        Self { backend, ladder }
    }

    /// Load and derive the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Backend` when the dashboard fetch fails,
    /// `ServiceError::Progress` when the backend reports a non-positive target or
    /// weekly goal, and `ServiceError::Timeline` for sessions with unreadable dates.
    /// A failed milestone fetch only drops the recorded rungs.
    pub async fn load(&self) -> Result<DashboardView, ServiceError> {
        let (record, milestones) =
            tokio::join!(self.backend.dashboard(), self.backend.list_milestones());
        let record = record?;
        let milestones = milestones.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "milestones unavailable; using live totals only");
            Vec::new()
        });
        let reached = reached_from_records(&milestones);
        tracing::debug!(
            recent = record.recent_sessions.len(),
            reached = reached.len(),
            "dashboard loaded"
        );

        let DashboardRecord {
            total_hours,
            target_hours,
            streaks,
            week_hours,
            week_goal,
            projected_completion,
            recent_sessions,
            uncelebrated_milestones,
        } = record;

        let snapshot =
            ProgressSnapshot::build(total_hours, target_hours, streaks, &self.ladder, Some(&reached))?;
        let weekly = compute_weekly_progress(week_hours, week_goal)?;
        let recent = merge(&recent_sessions, &[])?;

        Ok(DashboardView {
            weekly,
            week_hours,
            week_goal,
            projected_completion: projected_completion.as_deref().and_then(read_projection),
            recent,
            next_milestone: snapshot.next_milestone().cloned(),
            celebration: uncelebrated_milestones.into_iter().next(),
            snapshot,
        })
    }

    /// Log a session and surface any milestone it unlocked.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::EmptySession` for a zero duration, else backend errors.
    pub async fn log_session(&self, session: &NewSession) -> Result<LoggedSession, ServiceError> {
        if session.duration_minutes == 0 {
            return Err(ServiceError::EmptySession);
        }
        let created = self.backend.create_session(session).await?;
        if let Some(milestone) = &created.new_milestone {
            tracing::info!(hours = milestone.hours_reached, "milestone reached");
        }
        Ok(LoggedSession {
            session: created.session,
            celebration: created.new_milestone,
        })
    }

    /// Apply `changes` to an existing session.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::EmptySession` when the duration would become zero
    /// and `ServiceError::NothingToChange` when no field is set. A missing
    /// session surfaces as `BackendError::NotFound`.
    pub async fn edit_session(
        &self,
        id: SessionId,
        changes: &SessionChanges,
    ) -> Result<TrainingSession, ServiceError> {
        if changes.duration_minutes == Some(0) {
            return Err(ServiceError::EmptySession);
        }
        if changes.is_empty() {
            return Err(ServiceError::NothingToChange);
        }
        let session = self.backend.update_session(id, changes).await?;
        tracing::info!(session_id = %id, "session updated");
        Ok(session)
    }

    /// Mark a milestone as celebrated so it is not announced again.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Backend` if the backend rejects the update.
    pub async fn celebrate(&self, id: MilestoneId) -> Result<(), ServiceError> {
        self.backend.mark_milestone_celebrated(id).await?;
        Ok(())
    }
}

fn read_projection(raw: &str) -> Option<NaiveDate> {
    match parse_date(raw) {
        Ok(date) => Some(date),
        Err(err) => {
            tracing::warn!(%err, "ignoring unreadable projected completion");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::InMemoryBackend;
    use trainer_core::model::{FocusTags, Subject};

    #[tokio::test]
    async fn backend_percentages_are_recomputed_and_clamped() {
        let backend = InMemoryBackend::new().with_dashboard(DashboardRecord {
            total_hours: 320.0,
            target_hours: 300.0,
            week_hours: 9.0,
            week_goal: 6.0,
            ..DashboardRecord::default()
        });
        let service = DashboardService::new(Arc::new(backend), MilestoneLadder::default_hours());

        let view = service.load().await.unwrap();

        assert!((view.snapshot.progress.percentage - 100.0).abs() < f64::EPSILON);
        assert!(view.snapshot.progress.hours_remaining.abs() < f64::EPSILON);
        assert!(view.weekly.achieved);
        assert!(view.next_milestone.is_none());
    }

    #[tokio::test]
    async fn zero_target_is_a_progress_error() {
        let backend = InMemoryBackend::new().with_dashboard(DashboardRecord {
            target_hours: 0.0,
            ..DashboardRecord::default()
        });
        let service = DashboardService::new(Arc::new(backend), MilestoneLadder::default_hours());

        let err = service.load().await.unwrap_err();
        assert!(matches!(err, ServiceError::Progress(_)));
    }

    #[tokio::test]
    async fn recent_sessions_are_newest_first() {
        let sessions = ["2024-06-10", "2024-06-14", "2024-06-12"]
            .into_iter()
            .enumerate()
            .map(|(i, date)| {
                TrainingSession::new(
                    SessionId::new(i as u64 + 1),
                    date,
                    Subject::General,
                    None,
                    60,
                    FocusTags::new(),
                )
                .unwrap()
            })
            .collect();
        let backend = InMemoryBackend::new().with_dashboard(DashboardRecord {
            recent_sessions: sessions,
            projected_completion: Some("2025-02-01".into()),
            ..DashboardRecord::default()
        });
        let service = DashboardService::new(Arc::new(backend), MilestoneLadder::default_hours());

        let view = service.load().await.unwrap();
        let ids: Vec<u64> = view
            .recent
            .iter()
            .filter_map(TimelineEntry::as_session)
            .map(|s| s.id().value())
            .collect();

        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(view.projected_completion, NaiveDate::from_ymd_opt(2025, 2, 1));
    }

    #[tokio::test]
    async fn zero_minute_session_is_rejected_before_the_backend() {
        let backend = InMemoryBackend::new();
        let service = DashboardService::new(Arc::new(backend.clone()), MilestoneLadder::default_hours());

        let err = service
            .log_session(&NewSession {
                pet_id: None,
                session_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
                duration_minutes: 0,
                session_type: "training".into(),
                notes: None,
                focus: FocusTags::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::EmptySession));
        assert!(backend.list_sessions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn next_goal_skips_rungs_already_recorded() {
        let backend = InMemoryBackend::new()
            .with_dashboard(DashboardRecord {
                total_hours: 140.0,
                ..DashboardRecord::default()
            })
            .with_milestones(vec![MilestoneRecord {
                id: MilestoneId::new(1),
                hours_reached: 150,
                reached_at: None,
                celebrated: true,
            }]);
        let service = DashboardService::new(Arc::new(backend), MilestoneLadder::default_hours());

        let view = service.load().await.unwrap();

        assert_eq!(view.next_milestone.map(|m| m.threshold), Some(200));
    }

    #[tokio::test]
    async fn edits_are_validated_before_the_backend() {
        let service =
            DashboardService::new(Arc::new(InMemoryBackend::new()), MilestoneLadder::default_hours());

        let zero = SessionChanges {
            duration_minutes: Some(0),
            ..SessionChanges::default()
        };
        let err = service.edit_session(SessionId::new(1), &zero).await.unwrap_err();
        assert!(matches!(err, ServiceError::EmptySession));

        let err = service
            .edit_session(SessionId::new(1), &SessionChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NothingToChange));
    }
}
