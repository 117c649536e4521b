mod ids;
mod metadata;
mod note;
pub mod timestamp;

pub use ids::NoteId;
pub use metadata::{NoteMetadata, word_count};
pub use note::{DEFAULT_NOTE_TYPE, Note, NoteBuilder, NoteUpdate};
