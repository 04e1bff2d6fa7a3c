use serde::{Deserialize, Serialize};

use crate::model::{FocusTags, NoteId, PetId};

/// A free-form journal entry, optionally tied to a pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// Creation time exactly as the backend sent it.
    pub created_at: String,
    pub pet_id: Option<PetId>,
    pub pet_name: Option<String>,
    pub content: String,
    #[serde(default)]
    pub focus: FocusTags,
}

impl Note {
    #[must_use]
    pub fn new(id: NoteId, created_at: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            created_at: created_at.into(),
            pet_id: None,
            pet_name: None,
            content: content.into(),
            focus: FocusTags::new(),
        }
    }

    #[must_use]
    pub fn for_pet(mut self, pet_id: PetId, pet_name: Option<String>) -> Self {
        self.pet_id = Some(pet_id);
        self.pet_name = pet_name;
        self
    }

    #[must_use]
    pub fn with_focus(mut self, focus: FocusTags) -> Self {
        self.focus = focus;
        self
    }
}
