use std::sync::Arc;

use serde::Serialize;

use backend::TrainerBackend;
use backend::records::NewPet;
use trainer_core::Clock;
use trainer_core::catalog::partition_pets;
use trainer_core::model::{Pet, PetId};

use crate::error::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PetSummary {
    pub pet: Pet,
    /// Whole years, `None` without a birthdate.
    pub age_years: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PetsView {
    pub active: Vec<PetSummary>,
    pub inactive: Vec<PetSummary>,
}

#[derive(Clone)]
pub struct PetsService {
    backend: Arc<dyn TrainerBackend>,
    clock: Clock,
}

impl PetsService {
    #[must_use]
    pub fn new(backend: Arc<dyn TrainerBackend>, clock: Clock) -> Self {
        Self { backend, clock }
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Backend` if the roster cannot be fetched.
    pub async fn load(&self) -> Result<PetsView, ServiceError> {
        let pets = self.backend.list_pets().await?;
        let (active, inactive) = partition_pets(&pets);
        let summarize = |pets: Vec<Pet>| -> Vec<PetSummary> {
            pets.into_iter().map(|pet| self.summary(pet)).collect()
        };
        tracing::debug!(active = active.len(), inactive = inactive.len(), "pets loaded");

        Ok(PetsView {
            active: summarize(active),
            inactive: summarize(inactive),
        })
    }

    /// Register a new pet.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::MissingPetName` for a blank name, else backend errors.
    pub async fn add(&self, pet: &NewPet) -> Result<PetSummary, ServiceError> {
        if pet.name.trim().is_empty() {
            return Err(ServiceError::MissingPetName);
        }
        let created = self.backend.create_pet(pet).await?;
        tracing::info!(pet_id = %created.id, "pet created");
        Ok(self.summary(created))
    }

    /// Move a pet between the active and inactive rosters.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Backend` (`NotFound` for an unknown pet).
    pub async fn set_active(&self, id: PetId, active: bool) -> Result<PetSummary, ServiceError> {
        let pet = self.backend.set_pet_active(id, active).await?;
        tracing::info!(pet_id = %id, active, "pet status updated");
        Ok(self.summary(pet))
    }

    fn summary(&self, pet: Pet) -> PetSummary {
        PetSummary {
            age_years: pet.age_years(self.clock.today()),
            pet,
        }
    }
}
