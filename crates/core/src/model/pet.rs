use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::PetId;

const DAYS_PER_YEAR: f64 = 365.25;

/// A pet client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub birthdate: Option<NaiveDate>,
    pub sex: Option<String>,
    pub spayed_neutered: bool,
    pub behavioral_notes: Option<String>,
    pub allergies: Option<String>,
    pub active: bool,
    /// False when the pet was created from another system rather than by the trainer.
    pub origin_trainer: bool,
}

impl Pet {
    #[must_use]
    pub fn new(id: PetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            birthdate: None,
            sex: None,
            spayed_neutered: false,
            behavioral_notes: None,
            allergies: None,
            active: true,
            origin_trainer: true,
        }
    }

    /// Age in whole years on `today`, or `None` when the birthdate is unknown.
    ///
    /// Birthdates in the future count as zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn age_years(&self, today: NaiveDate) -> Option<u32> {
        let birthdate = self.birthdate?;
        let days = (today - birthdate).num_days();
        if days <= 0 {
            return Some(0);
        }
        Some((days as f64 / DAYS_PER_YEAR).floor() as u32)
    }
}
