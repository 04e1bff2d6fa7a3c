use std::sync::Arc;

use serde::Serialize;

use backend::TrainerBackend;
use trainer_core::stats::{FocusShare, MonthlyComparison, WeeklyTrendPoint, focus_breakdown};

use crate::error::ServiceError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsView {
    pub total_hours: f64,
    pub total_sessions: u32,
    pub unique_dogs: u32,
    pub average_session_minutes: f64,
    pub focus: Vec<FocusShare>,
    pub monthly: MonthlyComparison,
    pub weekly_trend: Vec<WeeklyTrendPoint>,
}

#[derive(Clone)]
pub struct StatsService {
    backend: Arc<dyn TrainerBackend>,
}

impl StatsService {
    #[must_use]
    pub fn new(backend: Arc<dyn TrainerBackend>) -> Self {
        Self { backend }
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Backend` if the stats aggregate cannot be fetched.
    pub async fn load(&self) -> Result<StatsView, ServiceError> {
        let record = self.backend.stats().await?;
        let focus = focus_breakdown(&record.breakdown_by_type);
        tracing::debug!(slices = focus.len(), weeks = record.weekly_trend.len(), "stats loaded");

        Ok(StatsView {
            total_hours: record.total_hours,
            total_sessions: record.total_sessions,
            unique_dogs: record.unique_dogs,
            average_session_minutes: record.average_session_minutes,
            focus,
            monthly: record.monthly,
            weekly_trend: record.weekly_trend,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::InMemoryBackend;
    use backend::records::StatsRecord;

    #[tokio::test]
    async fn breakdown_is_labelled_and_shared() {
        let backend = InMemoryBackend::new().with_stats(StatsRecord {
            total_hours: 4.0,
            breakdown_by_type: vec![
                ("leash_manners".into(), 3.0),
                ("recall".into(), 1.0),
            ],
            monthly: MonthlyComparison {
                this_month: 4.0,
                last_month: 5.0,
                change_percentage: -20.0,
            },
            ..StatsRecord::default()
        });

        let view = StatsService::new(Arc::new(backend)).load().await.unwrap();

        let labels: Vec<(&str, u32)> = view
            .focus
            .iter()
            .map(|s| (s.label.as_str(), s.percent))
            .collect();
        assert_eq!(labels, vec![("Leash Manners", 75), ("Recall", 25)]);
        assert_eq!(view.monthly.summary(), "↓ 20.0% vs last month");
    }
}
