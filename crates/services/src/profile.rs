use std::sync::Arc;

use serde::Serialize;

use backend::TrainerBackend;
use backend::records::{GoalDraft, GoalRecord};
use trainer_core::catalog::ReadingList;
use trainer_core::model::MilestoneLadder;
use trainer_core::progress::reached_from_records;
use trainer_core::{
    MilestoneState, Progress, Streaks, TrainerLevel, compute_milestone_states, compute_progress,
};

use crate::error::ServiceError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    pub level: TrainerLevel,
    pub total_hours: f64,
    pub total_sessions: u32,
    pub streaks: Streaks,
    /// Target the progress figure is measured against.
    pub target_hours: f64,
    pub progress: Progress,
    pub goal: Option<GoalRecord>,
    pub hour_milestones: Vec<MilestoneState>,
    pub books_read: usize,
    pub book_milestones: Vec<MilestoneState>,
}

#[derive(Clone)]
pub struct ProfileService {
    backend: Arc<dyn TrainerBackend>,
    hour_ladder: MilestoneLadder,
    book_ladder: MilestoneLadder,
    fallback_target_hours: f64,
}

impl ProfileService {
    #[must_use]
    pub fn new(
        backend: Arc<dyn TrainerBackend>,
        hour_ladder: MilestoneLadder,
        book_ladder: MilestoneLadder,
        fallback_target_hours: f64,
    ) -> Self {
        Self {
            backend,
            hour_ladder,
            book_ladder,
            fallback_target_hours,
        }
    }

    /// Assemble the trainer profile.
    ///
    /// Hour milestones unlock from the backend's recorded milestones as well as
    /// the live total. Book milestones are live only. A missing certification
    /// goal falls back to the configured target.
    ///
    /// # Errors
    ///
    /// Fails when the goal or summary cannot be fetched, or when the resulting
    /// target is not positive. Milestone and reading-list failures only degrade
    /// the view.
    pub async fn load(&self) -> Result<ProfileView, ServiceError> {
        let (goal, summary, milestones, my_books) = tokio::join!(
            self.backend.certification_goal(),
            self.backend.summary(),
            self.backend.list_milestones(),
            self.backend.my_books(),
        );
        let goal = goal?;
        let summary = summary?;
        let milestones = milestones.unwrap_or_else(|err| {
            tracing::warn!(%err, "milestones unavailable; showing live progress only");
            Vec::new()
        });
        let my_books = my_books.unwrap_or_else(|err| {
            tracing::warn!(%err, "reading list unavailable");
            Vec::new()
        });

        let target_hours = goal
            .as_ref()
            .map_or(self.fallback_target_hours, |g| g.target_hours);
        let progress = compute_progress(summary.total_hours, target_hours)?;

        let reached = reached_from_records(&milestones);
        let books_read = ReadingList::group(&my_books).books_read();
        let hour_milestones =
            compute_milestone_states(summary.total_hours, &self.hour_ladder, Some(&reached));
        #[allow(clippy::cast_precision_loss)]
        let book_milestones =
            compute_milestone_states(books_read as f64, &self.book_ladder, None);

        tracing::debug!(
            reached = reached.len(),
            books_read,
            has_goal = goal.is_some(),
            "profile assembled"
        );

        Ok(ProfileView {
            level: TrainerLevel::from_hours(summary.total_hours),
            total_hours: summary.total_hours,
            total_sessions: summary.total_sessions,
            streaks: summary.streaks,
            target_hours,
            progress,
            goal,
            hour_milestones,
            books_read,
            book_milestones,
        })
    }

    /// Create the certification goal, or update the existing one.
    ///
    /// A new goal without a target uses the configured fallback; an update
    /// without one keeps the stored target.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidWeeklyGoal` or `ServiceError::InvalidTargetHours`
    /// for non-positive figures, else backend errors.
    pub async fn save_goal(&self, draft: &GoalDraft) -> Result<GoalRecord, ServiceError> {
        if !positive(draft.weekly_goal_hours) {
            return Err(ServiceError::InvalidWeeklyGoal {
                hours: draft.weekly_goal_hours,
            });
        }
        if let Some(target) = draft.target_hours.filter(|t| !positive(*t)) {
            return Err(ServiceError::InvalidTargetHours {
                raw: target.to_string(),
            });
        }

        let saved = if self.backend.certification_goal().await?.is_some() {
            self.backend.update_goal(draft).await?
        } else {
            let draft = GoalDraft {
                target_hours: Some(draft.target_hours.unwrap_or(self.fallback_target_hours)),
                ..draft.clone()
            };
            self.backend.create_goal(&draft).await?
        };
        tracing::info!(
            certification = %saved.certification_type,
            target_hours = saved.target_hours,
            "certification goal saved"
        );
        Ok(saved)
    }
}

fn positive(hours: f64) -> bool {
    hours.is_finite() && hours > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::InMemoryBackend;
    use backend::records::SummaryRecord;
    use trainer_core::model::{Book, BookId, MilestoneId, MilestoneRecord, ReadingStatus};

    fn service(backend: InMemoryBackend) -> ProfileService {
        ProfileService::new(
            Arc::new(backend),
            MilestoneLadder::default_hours(),
            MilestoneLadder::default_books(),
            300.0,
        )
    }

    fn summary(total_hours: f64) -> SummaryRecord {
        SummaryRecord {
            total_hours,
            total_sessions: 40,
            streaks: Streaks {
                current_days: 3,
                longest_days: 9,
            },
        }
    }

    #[tokio::test]
    async fn missing_goal_uses_the_fallback_target() {
        let profile = service(InMemoryBackend::new().with_summary(summary(150.0)))
            .load()
            .await
            .unwrap();

        assert!(profile.goal.is_none());
        assert!((profile.target_hours - 300.0).abs() < f64::EPSILON);
        assert!((profile.progress.percentage - 50.0).abs() < f64::EPSILON);
        assert_eq!(profile.level, TrainerLevel::Advanced);
        assert_eq!(profile.streaks.longest_days, 9);
    }

    #[tokio::test]
    async fn recorded_milestones_unlock_beyond_the_live_total() {
        let backend = InMemoryBackend::new()
            .with_summary(summary(80.0))
            .with_milestones(vec![MilestoneRecord {
                id: MilestoneId::new(1),
                hours_reached: 100,
                reached_at: None,
                celebrated: true,
            }]);

        let profile = service(backend).load().await.unwrap();
        let unlocked: Vec<u32> = profile
            .hour_milestones
            .iter()
            .filter(|m| m.unlocked)
            .map(|m| m.milestone.threshold)
            .collect();

        assert_eq!(unlocked, vec![50, 100]);
    }

    #[tokio::test]
    async fn book_milestones_follow_books_read() {
        let books: Vec<Book> = (1..=6)
            .map(|i| {
                let status = if i == 6 {
                    ReadingStatus::InProgress
                } else {
                    ReadingStatus::Read
                };
                Book::new(BookId::new(i), format!("Book {i}"), "Author").with_status(status)
            })
            .collect();
        let backend = InMemoryBackend::new()
            .with_summary(summary(10.0))
            .with_books(Vec::new(), books);

        let profile = service(backend).load().await.unwrap();

        assert_eq!(profile.books_read, 5);
        assert_eq!(
            profile.book_milestones.iter().filter(|m| m.unlocked).count(),
            1
        );
    }

    fn draft(target_hours: Option<f64>, weekly_goal_hours: f64) -> GoalDraft {
        GoalDraft {
            certification_type: "CPDT-KA".into(),
            target_hours,
            weekly_goal_hours,
            target_completion_date: None,
        }
    }

    #[tokio::test]
    async fn first_goal_is_created_with_the_fallback_target() {
        let backend = InMemoryBackend::new().with_summary(summary(150.0));
        let service = service(backend.clone());

        let created = service.save_goal(&draft(None, 5.0)).await.unwrap();
        assert!((created.target_hours - 300.0).abs() < f64::EPSILON);

        let updated = service.save_goal(&draft(Some(200.0), 6.0)).await.unwrap();
        assert!((updated.target_hours - 200.0).abs() < f64::EPSILON);

        let profile = service.load().await.unwrap();
        assert!((profile.progress.percentage - 75.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn non_positive_goal_figures_are_rejected() {
        let service = service(InMemoryBackend::new());

        let err = service.save_goal(&draft(None, 0.0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidWeeklyGoal { .. }));

        let err = service.save_goal(&draft(Some(-5.0), 4.0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTargetHours { .. }));
    }
}
