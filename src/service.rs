use std::sync::Arc;

use log::{info, warn};
use thiserror::Error;

use crate::advisor::{AnalysisReply, Answer, ContextScope, NoteAdvisor};
use crate::analytics::{self, MoodTrends, Statistics};
use crate::autotagger::KeywordTagger;
use crate::config::Config;
use crate::gemini::{GeminiClientBuilder, GeminiClientTrait, GeminiError};
use crate::models::{Note, NoteBuilder, NoteId, NoteUpdate, timestamp};
use crate::ranker::DEFAULT_TOP_K;
use crate::store::{ListFilter, NoteStore, StoreError};

/// Type assigned to quick journal entries.
pub const JOURNAL_NOTE_TYPE: &str = "journal";

/// Errors surfaced by [`NoteService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The input was rejected before touching the store.
    #[error("{0}")]
    Validation(String),

    /// An AI feature was requested without an API key.
    #[error("AI features are disabled: set GEMINI_API_KEY to enable them")]
    AiDisabled,

    /// An API key is set but the client could not be created.
    #[error("AI features are unavailable: {0}")]
    AiUnavailable(String),

    /// The operation needs at least one note.
    #[error("No notes to analyze yet")]
    NoNotes,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Gemini(#[from] GeminiError),
}

impl ServiceError {
    /// Returns true for errors caused by the user's input or setup rather
    /// than by the system.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_)
                | ServiceError::AiDisabled
                | ServiceError::NoNotes
                | ServiceError::Store(StoreError::NotFound(_) | StoreError::DuplicateId(_))
        )
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Input for a new note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    /// Defaults to `general` when `None`.
    pub kind: Option<String>,
    pub mood: Option<u8>,
    pub energy_level: Option<u8>,
}

impl NewNote {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }
}

/// Service layer providing note management, analytics and AI operations.
///
/// `NoteService` owns the [`NoteStore`] and, when an API key is configured,
/// a remote client. It validates user input before anything is written and
/// is independent of the command line front end.
///
/// # Examples
///
/// ```
/// use smart_notes::{NewNote, NoteService, NoteStore};
///
/// # fn main() -> Result<(), smart_notes::ServiceError> {
/// let mut service = NoteService::new(NoteStore::in_memory());
/// let note = service.add_note(NewNote::new("A", "hello world"))?;
/// assert_eq!(note.metadata.word_count, 2);
/// assert_eq!(service.search("hello")?.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct NoteService {
    store: NoteStore,
    client: Option<Arc<dyn GeminiClientTrait>>,
    // Why the configured client could not be built.
    client_error: Option<String>,
    tagger: KeywordTagger,
    top_k: usize,
}

impl NoteService {
    /// Creates a service without AI features.
    pub fn new(store: NoteStore) -> Self {
        Self {
            store,
            client: None,
            client_error: None,
            tagger: KeywordTagger::default(),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Opens the configured notes file and, if an API key is present, builds
    /// the remote client.
    ///
    /// A client that fails to build (for example an unparsable base URL)
    /// leaves AI features off; the failure is logged and reported by `ask`
    /// and `analyze_patterns`. Store operations are unaffected.
    pub fn from_config(config: &Config) -> Self {
        let mut service = Self::new(NoteStore::open(&config.notes_file));
        if !config.ai_enabled() {
            info!("no API key configured, AI features disabled");
            return service;
        }

        match GeminiClientBuilder::from_config(config).build() {
            Ok(client) => service.with_client(Arc::new(client)),
            Err(e) => {
                warn!("could not create the AI client, AI features disabled: {e}");
                service.client_error = Some(e.to_string());
                service
            }
        }
    }

    /// Enables AI features using `client`.
    #[must_use]
    pub fn with_client(mut self, client: Arc<dyn GeminiClientTrait>) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets how many notes relevance-ranked questions use.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn ai_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Validates and stores a new note.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] if the title or content is blank.
    pub fn add_note(&mut self, note: NewNote) -> Result<&Note> {
        let title = required("Title", note.title)?;
        let content = required("Content", note.content)?;

        let mut builder = NoteBuilder::new(title, content)
            .tags(clean_tags(note.tags))
            .maybe_mood(note.mood)
            .maybe_energy_level(note.energy_level);
        if let Some(kind) = note.kind.filter(|k| !k.trim().is_empty()) {
            builder = builder.kind(kind.trim());
        }

        Ok(self.store.add(builder)?)
    }

    /// Stores a journal entry with keyword-generated tags.
    ///
    /// A blank title becomes `Journal - YYYY-MM-DD` for today.
    pub fn quick_journal(
        &mut self,
        title: Option<String>,
        content: String,
        mood: Option<u8>,
        energy_level: Option<u8>,
    ) -> Result<&Note> {
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(default_journal_title);
        let tags = self.tagger.suggest_tags(&content);

        self.add_note(NewNote {
            title,
            content,
            tags,
            kind: Some(JOURNAL_NOTE_TYPE.to_string()),
            mood,
            energy_level,
        })
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.store.get(id)
    }

    /// Notes in insertion order, optionally filtered by tag and/or type.
    pub fn list(&self, filter: &ListFilter) -> Vec<&Note> {
        self.store.list(filter)
    }

    /// Case-insensitive substring search over title, content and tags.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for a blank query.
    pub fn search(&self, query: &str) -> Result<Vec<&Note>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ServiceError::Validation(
                "Search query cannot be empty".to_string(),
            ));
        }
        Ok(self.store.search(query))
    }

    /// Applies a partial update to an existing note.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when nothing would change or a
    /// provided title or content is blank, and a store `NotFound` error for
    /// an unknown id.
    pub fn update_note(&mut self, id: &NoteId, update: NoteUpdate) -> Result<&Note> {
        if update.is_empty() {
            return Err(ServiceError::Validation(
                "Nothing to update: provide a title, content, tags or type".to_string(),
            ));
        }

        let update = NoteUpdate {
            title: update.title.map(|t| required("Title", t)).transpose()?,
            content: update.content.map(|c| required("Content", c)).transpose()?,
            tags: update.tags.map(clean_tags),
            kind: update.kind.map(|k| required("Type", k)).transpose()?,
        };

        Ok(self.store.update(id, update)?)
    }

    /// Removes a note, returning it.
    pub fn delete_note(&mut self, id: &NoteId) -> Result<Note> {
        Ok(self.store.delete(id)?)
    }

    /// Asks a question about the notes.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::AiDisabled`] without a client,
    /// [`ServiceError::AiUnavailable`] if the configured client failed to build,
    /// [`ServiceError::Validation`] for a blank question and
    /// [`ServiceError::Gemini`] if the generation call fails.
    pub fn ask(&self, question: &str, scope: ContextScope) -> Result<Answer> {
        let client = self.client()?;
        let question = question.trim();
        if question.is_empty() {
            return Err(ServiceError::Validation(
                "Question cannot be empty".to_string(),
            ));
        }

        let advisor = NoteAdvisor::new(client).with_top_k(self.top_k);
        Ok(advisor.ask(question, self.store.notes(), scope)?)
    }

    /// Produces the AI insights report over every note.
    pub fn analyze_patterns(&self) -> Result<AnalysisReply> {
        let client = self.client()?;
        if self.store.is_empty() {
            return Err(ServiceError::NoNotes);
        }

        Ok(NoteAdvisor::new(client).analyze_patterns(self.store.notes())?)
    }

    /// Totals and averages; `None` for an empty store.
    pub fn statistics(&self) -> Option<Statistics> {
        analytics::statistics(self.store.notes())
    }

    /// Mood trends; `None` when no note has a mood rating.
    pub fn mood_trends(&self) -> Option<MoodTrends> {
        analytics::mood_trends(self.store.notes())
    }

    fn client(&self) -> Result<Arc<dyn GeminiClientTrait>> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        match &self.client_error {
            Some(reason) => Err(ServiceError::AiUnavailable(reason.clone())),
            None => {
                warn!("AI feature requested without an API key");
                Err(ServiceError::AiDisabled)
            }
        }
    }
}

fn required(field: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

// Trims each tag and drops blanks. Case and order are kept.
fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn default_journal_title() -> String {
    let now = timestamp::now();
    let date = now.date();
    format!(
        "Journal - {:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

#[cfg(test)]
mod tests;
