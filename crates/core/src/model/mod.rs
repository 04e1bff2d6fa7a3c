mod book;
mod ids;
mod milestone;
mod note;
mod pet;
mod session;
mod tag;

pub use ids::{BookId, MilestoneId, NoteId, ParseIdError, PetId, SessionId};

pub use book::{Book, ParseStatusError, ReadingStatus};
pub use milestone::{LadderError, Milestone, MilestoneLadder, MilestoneRecord};
pub use note::Note;
pub use pet::Pet;
pub use session::{GENERAL_SUBJECT, RecordError, Subject, TrainingSession};
pub use tag::{FocusTags, TagError, TagName};
