mod collection;


use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

use crate::models::{Note, NoteBuilder, NoteId, NoteUpdate, timestamp};

pub use collection::NoteCollection;

/// Errors raised by store mutations.
///
/// Reading the document never fails: a missing or corrupt file yields an
/// empty store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No note exists with the given id.
    #[error("Note with ID {0} not found")]
    NotFound(NoteId),

    /// An explicit id passed to `add` is already taken.
    #[error("Note with ID {0} already exists")]
    DuplicateId(NoteId),

    /// The document could not be written.
    #[error("Failed to write notes file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The collection could not be encoded as JSON.
    #[error("Failed to serialize notes: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// Filter applied by [`NoteStore::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Keep notes carrying this tag (case-insensitive exact match).
    pub tag: Option<String>,
    /// Keep notes of this type (case-insensitive).
    pub kind: Option<String>,
}

impl ListFilter {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            kind: None,
        }
    }

    pub fn kind(kind: impl Into<String>) -> Self {
        Self {
            tag: None,
            kind: Some(kind.into()),
        }
    }

    fn accepts(&self, note: &Note) -> bool {
        let tag_ok = self.tag.as_deref().is_none_or(|tag| note.has_tag(tag));
        let kind_ok = self
            .kind
            .as_deref()
            .is_none_or(|kind| note.kind.to_lowercase() == kind.to_lowercase());
        tag_ok && kind_ok
    }
}

/// Durable mapping from note id to note, backed by one JSON document.
///
/// The whole document is read at construction and rewritten after every
/// mutation. If the write fails the in-memory change is rolled back so the
/// store keeps mirroring the file.
///
/// # Examples
///
/// ```
/// use smart_notes::{NoteBuilder, NoteStore};
///
/// let mut store = NoteStore::in_memory();
/// let id = store.add(NoteBuilder::new("A", "hello world")).unwrap().id.clone();
///
/// assert_eq!(store.len(), 1);
/// assert_eq!(store.search("HELLO").len(), 1);
/// assert!(store.get(&id).is_some());
/// ```
#[derive(Debug)]
pub struct NoteStore {
    path: Option<PathBuf>,
    notes: NoteCollection,
}

impl NoteStore {
    /// Creates a store with no backing file. Saves are no-ops.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            notes: NoteCollection::default(),
        }
    }

    /// Opens the document at `path`.
    ///
    /// A missing file or a document that fails to parse results in an empty
    /// store; the file is only touched on the next mutation.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let notes = load_collection(&path);
        debug!("loaded {} notes from {}", notes.len(), path.display());
        Self {
            path: Some(path),
            notes,
        }
    }

    /// Path of the backing document, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.get(id)
    }

    /// All notes in insertion order.
    pub fn notes(&self) -> &[Note] {
        self.notes.as_slice()
    }

    /// Adds a note and persists the store.
    ///
    /// Generated ids are regenerated until unique. An explicit id that is
    /// already taken is rejected.
    pub fn add(&mut self, builder: NoteBuilder) -> Result<&Note, StoreError> {
        if let Some(id) = builder.explicit_id()
            && self.notes.contains(id)
        {
            return Err(StoreError::DuplicateId(id.clone()));
        }

        let mut note = builder.build();
        while self.notes.contains(&note.id) {
            note.id = NoteId::generate();
        }

        let index = self.notes.upsert(note);
        if let Err(e) = self.save() {
            self.notes.remove_at(index);
            return Err(e);
        }
        Ok(&self.notes.as_slice()[index])
    }

    /// Applies `update` to the note with `id` and persists the store.
    pub fn update(&mut self, id: &NoteId, update: NoteUpdate) -> Result<&Note, StoreError> {
        let index = self
            .notes
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let previous = self.notes.as_slice()[index].clone();
        if let Some(note) = self.notes.get_mut(id) {
            update.apply(note, timestamp::now());
        }

        if let Err(e) = self.save() {
            self.notes.upsert(previous);
            return Err(e);
        }
        Ok(&self.notes.as_slice()[index])
    }

    /// Removes the note with `id` and persists the store.
    ///
    /// Returns the removed note. An unknown id leaves the store and its
    /// document untouched.
    pub fn delete(&mut self, id: &NoteId) -> Result<Note, StoreError> {
        let index = self
            .notes
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let removed = self.notes.remove_at(index);
        if let Err(e) = self.save() {
            self.notes.insert_at(index, removed);
            return Err(e);
        }
        Ok(removed)
    }

    /// Notes accepted by `filter`, in insertion order.
    pub fn list(&self, filter: &ListFilter) -> Vec<&Note> {
        self.notes.iter().filter(|n| filter.accepts(n)).collect()
    }

    /// Case-insensitive substring search over title, content and tags.
    ///
    /// Returns every match in insertion order.
    pub fn search(&self, query: &str) -> Vec<&Note> {
        let query = query.to_lowercase();
        self.notes
            .iter()
            .filter(|n| n.matches_lowercase(&query))
            .collect()
    }

    /// Writes the whole collection to the backing document.
    ///
    /// The document is written to a sibling temporary file first and then
    /// renamed over the original.
    pub fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(&self.notes).map_err(StoreError::Serialization)?;

        let io_err = |source: io::Error| StoreError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let tmp = temp_path(path);
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, path).map_err(io_err)?;

        debug!("saved {} notes to {}", self.notes.len(), path.display());
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "notes.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

fn load_collection(path: &Path) -> NoteCollection {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return NoteCollection::default(),
        Err(e) => {
            warn!("could not read {}: {e}; starting empty", path.display());
            return NoteCollection::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(notes) => notes,
        Err(e) => {
            warn!("could not parse {}: {e}; starting empty", path.display());
            NoteCollection::default()
        }
    }
}
