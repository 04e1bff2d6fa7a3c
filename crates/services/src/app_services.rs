use std::sync::Arc;

use backend::{BackendConfig, HttpBackend, TrainerBackend};
use trainer_core::Clock;

use crate::activity::ActivityService;
use crate::books::BooksService;
use crate::config::ServicesConfig;
use crate::dashboard::DashboardService;
use crate::error::ServiceError;
use crate::pets::PetsService;
use crate::profile::ProfileService;
use crate::stats::StatsService;

/// Assembles every view service over one shared backend.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    dashboard: Arc<DashboardService>,
    activity: Arc<ActivityService>,
    profile: Arc<ProfileService>,
    stats: Arc<StatsService>,
    books: Arc<BooksService>,
    pets: Arc<PetsService>,
}

impl AppServices {
    /// Build services backed by the REST API.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Backend` if the HTTP client cannot be built.
    pub fn http(
        backend_config: BackendConfig,
        config: ServicesConfig,
        clock: Clock,
    ) -> Result<Self, ServiceError> {
        tracing::debug!(base_url = backend_config.base_url(), "using http backend");
        let backend = HttpBackend::new(backend_config)?;
        Ok(Self::new(Arc::new(backend), config, clock))
    }

    #[must_use]
    pub fn new(backend: Arc<dyn TrainerBackend>, config: ServicesConfig, clock: Clock) -> Self {
        let ServicesConfig {
            hour_ladder,
            book_ladder,
            fallback_target_hours,
        } = config;

        Self {
            clock,
            dashboard: Arc::new(DashboardService::new(
                Arc::clone(&backend),
                hour_ladder.clone(),
            )),
            activity: Arc::new(ActivityService::new(Arc::clone(&backend))),
            profile: Arc::new(ProfileService::new(
                Arc::clone(&backend),
                hour_ladder,
                book_ladder,
                fallback_target_hours,
            )),
            stats: Arc::new(StatsService::new(Arc::clone(&backend))),
            books: Arc::new(BooksService::new(Arc::clone(&backend))),
            pets: Arc::new(PetsService::new(backend, clock)),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    #[must_use]
    pub fn activity(&self) -> Arc<ActivityService> {
        Arc::clone(&self.activity)
    }

    #[must_use]
    pub fn profile(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profile)
    }

    #[must_use]
    pub fn stats(&self) -> Arc<StatsService> {
        Arc::clone(&self.stats)
    }

    #[must_use]
    pub fn books(&self) -> Arc<BooksService> {
        Arc::clone(&self.books)
    }

    #[must_use]
    pub fn pets(&self) -> Arc<PetsService> {
        Arc::clone(&self.pets)
    }
}
