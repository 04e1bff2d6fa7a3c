use std::env;

use trainer_core::model::MilestoneLadder;

use crate::error::ServiceError;

/// Fallback certification target when the trainer has no goal set.
pub const DEFAULT_TARGET_HOURS: f64 = 300.0;

/// View-level settings shared by the services.
#[derive(Debug, Clone, PartialEq)]
pub struct ServicesConfig {
    pub hour_ladder: MilestoneLadder,
    pub book_ladder: MilestoneLadder,
    pub fallback_target_hours: f64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            hour_ladder: MilestoneLadder::default_hours(),
            book_ladder: MilestoneLadder::default_books(),
            fallback_target_hours: DEFAULT_TARGET_HOURS,
        }
    }
}

impl ServicesConfig {
    /// Read overrides from the environment.
    ///
    /// `TRAINER_TARGET_HOURS` replaces the fallback target.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidTargetHours` when the variable is set but
    /// is not a positive number.
    pub fn from_env() -> Result<Self, ServiceError> {
        let mut config = Self::default();
        if let Ok(raw) = env::var("TRAINER_TARGET_HOURS") {
            config.fallback_target_hours = parse_target_hours(&raw)?;
        }
        Ok(config)
    }
}

/// Parse a positive, finite hour target.
///
/// # Errors
///
/// Returns `ServiceError::InvalidTargetHours` for anything else.
pub fn parse_target_hours(raw: &str) -> Result<f64, ServiceError> {
    match raw.trim().parse::<f64>() {
        Ok(hours) if hours.is_finite() && hours > 0.0 => Ok(hours),
        _ => Err(ServiceError::InvalidTargetHours {
            raw: raw.to_string(),
        }),
    }
}
