#![forbid(unsafe_code)]

pub mod activity;
pub mod app_services;
pub mod books;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod pets;
pub mod profile;
pub mod stats;

pub use trainer_core::Clock;

pub use activity::{ActivityService, PetActivityView};
pub use app_services::AppServices;
pub use books::{BooksService, BooksView, Recommendation};
pub use config::ServicesConfig;
pub use dashboard::{DashboardService, DashboardView, LoggedSession};
pub use error::ServiceError;
pub use pets::{PetSummary, PetsService, PetsView};
pub use profile::{ProfileService, ProfileView};
pub use stats::{StatsService, StatsView};
