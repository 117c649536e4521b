use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::metadata::word_count;
use super::{NoteId, NoteMetadata, timestamp};

/// Classification used when none is given.
pub const DEFAULT_NOTE_TYPE: &str = "general";

fn default_note_type() -> String {
    DEFAULT_NOTE_TYPE.to_string()
}

/// A note with its content, tags and self-exploration metadata.
///
/// In the JSON document the id is the object key, so it is skipped here and
/// filled in by the store when the document is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier, assigned at creation.
    #[serde(skip)]
    pub id: NoteId,
    /// Short title.
    pub title: String,
    /// The note's text.
    pub content: String,
    /// When this note was created.
    #[serde(with = "timestamp")]
    pub created: OffsetDateTime,
    /// When this note was last changed.
    #[serde(with = "timestamp")]
    pub updated: OffsetDateTime,
    /// Free-form labels, in the order the user gave them.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-text classification such as "journal", "goal" or "principle".
    #[serde(rename = "type", default = "default_note_type")]
    pub kind: String,
    #[serde(default)]
    pub metadata: NoteMetadata,
}

impl Note {
    /// Returns true if `query` occurs in the title, content or any tag,
    /// ignoring case.
    ///
    /// The query is expected to be lowercased already.
    pub fn matches_lowercase(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(query)
            || self.content.to_lowercase().contains(query)
            || self.tags.iter().any(|t| t.to_lowercase().contains(query))
    }

    /// Returns true if the note carries `tag`, ignoring case.
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }

    /// Text submitted to the embedding endpoint for this note.
    pub fn embedding_text(&self) -> String {
        format!("{} {} {}", self.title, self.content, self.tags.join(" "))
    }

    /// Hour of day the note was created, preferring the stored metadata value.
    pub fn created_hour(&self) -> u8 {
        self.metadata.created_hour.unwrap_or_else(|| self.created.hour())
    }

    /// Creation date as `YYYY-MM-DD`.
    pub fn created_date(&self) -> String {
        self.metadata.created_date_only.clone().unwrap_or_else(|| {
            let date = self.created.date();
            format!(
                "{:04}-{:02}-{:02}",
                date.year(),
                u8::from(date.month()),
                date.day()
            )
        })
    }
}

/// Builder for new notes.
///
/// Generates the id and timestamps and derives the word count from the
/// content.
///
/// # Examples
///
/// ```
/// use smart_notes::NoteBuilder;
///
/// let note = NoteBuilder::new("Morning", "Walked by the river")
///     .kind("journal")
///     .mood(8)
///     .build();
///
/// assert_eq!(note.kind, "journal");
/// assert_eq!(note.metadata.word_count, 4);
/// assert!(note.id.as_str().starts_with("note_"));
/// ```
#[derive(Debug, Clone)]
pub struct NoteBuilder {
    id: Option<NoteId>,
    title: String,
    content: String,
    tags: Vec<String>,
    kind: Option<String>,
    mood: Option<u8>,
    energy_level: Option<u8>,
    created_at: Option<OffsetDateTime>,
}

impl NoteBuilder {
    /// Creates a builder with the required title and content.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            kind: None,
            mood: None,
            energy_level: None,
            created_at: None,
        }
    }

    /// Sets an explicit id instead of generating one.
    pub fn id(mut self, id: NoteId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Sets the note type. Defaults to "general".
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn mood(mut self, mood: u8) -> Self {
        self.mood = Some(mood);
        self
    }

    pub fn maybe_mood(mut self, mood: Option<u8>) -> Self {
        self.mood = mood;
        self
    }

    pub fn energy_level(mut self, energy_level: u8) -> Self {
        self.energy_level = Some(energy_level);
        self
    }

    pub fn maybe_energy_level(mut self, energy_level: Option<u8>) -> Self {
        self.energy_level = energy_level;
        self
    }

    /// Sets the creation time. Defaults to the current local time.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Returns the id this builder will use, if one was set.
    pub fn explicit_id(&self) -> Option<&NoteId> {
        self.id.as_ref()
    }

    /// Builds the note. `created` and `updated` are equal.
    pub fn build(self) -> Note {
        let created = self.created_at.unwrap_or_else(timestamp::now);
        let metadata = NoteMetadata {
            mood: self.mood,
            energy_level: self.energy_level,
            word_count: word_count(&self.content),
            created_date_only: None,
            created_hour: Some(created.hour()),
        };

        let mut note = Note {
            id: self.id.unwrap_or_else(NoteId::generate),
            title: self.title,
            content: self.content,
            created,
            updated: created,
            tags: self.tags,
            kind: self.kind.unwrap_or_else(default_note_type),
            metadata,
        };
        note.metadata.created_date_only = Some(note.created_date());
        note
    }
}

/// A partial change to an existing note. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub kind: Option<String>,
}

impl NoteUpdate {
    /// Returns true if no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none() && self.kind.is_none()
    }

    /// Applies the change and refreshes `updated`.
    ///
    /// The word count is not recomputed.
    pub fn apply(self, note: &mut Note, now: OffsetDateTime) {
        if let Some(title) = self.title {
            note.title = title;
        }
        if let Some(content) = self.content {
            note.content = content;
        }
        if let Some(tags) = self.tags {
            note.tags = tags;
        }
        if let Some(kind) = self.kind {
            note.kind = kind;
        }
        note.updated = now;
    }
}
