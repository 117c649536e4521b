//! Insertion-ordered note collection with the on-disk object-of-objects shape.

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::{Note, NoteId};

/// Notes keyed by id, iterated in insertion order.
///
/// Serializes as a JSON object whose keys are note ids and whose values are
/// the note records. Key order in the document is preserved on read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteCollection {
    notes: Vec<Note>,
    // Position of each id in `notes`.
    index: HashMap<NoteId, usize>,
}

impl NoteCollection {
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn as_slice(&self) -> &[Note] {
        &self.notes
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.index.contains_key(id)
    }

    pub fn position(&self, id: &NoteId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.position(id).map(|i| &self.notes[i])
    }

    /// Mutable access to a note. The id must not be changed through it.
    pub fn get_mut(&mut self, id: &NoteId) -> Option<&mut Note> {
        self.position(id).map(|i| &mut self.notes[i])
    }

    /// Inserts a note, replacing any note with the same id in place.
    pub fn upsert(&mut self, note: Note) -> usize {
        match self.position(&note.id) {
            Some(index) => {
                self.notes[index] = note;
                index
            }
            None => {
                let index = self.notes.len();
                self.index.insert(note.id.clone(), index);
                self.notes.push(note);
                index
            }
        }
    }

    pub fn insert_at(&mut self, index: usize, note: Note) {
        let index = index.min(self.notes.len());
        self.notes.insert(index, note);
        self.reindex_from(index);
    }

    pub fn remove_at(&mut self, index: usize) -> Note {
        let note = self.notes.remove(index);
        self.index.remove(&note.id);
        self.reindex_from(index);
        note
    }

    fn reindex_from(&mut self, start: usize) {
        for (offset, note) in self.notes[start..].iter().enumerate() {
            self.index.insert(note.id.clone(), start + offset);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Note> {
        self.notes.iter()
    }
}

impl Serialize for NoteCollection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.notes.len()))?;
        for note in &self.notes {
            map.serialize_entry(&note.id, note)?;
        }
        map.end()
    }
}

struct CollectionVisitor;

impl<'de> Visitor<'de> for CollectionVisitor {
    type Value = NoteCollection;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping note ids to notes")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let capacity = access.size_hint().unwrap_or(0);
        let mut collection = NoteCollection {
            notes: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        };
        while let Some((id, mut note)) = access.next_entry::<NoteId, Note>()? {
            note.id = id;
            collection.upsert(note);
        }
        Ok(collection)
    }
}

impl<'de> Deserialize<'de> for NoteCollection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CollectionVisitor)
    }
}

impl<'a> IntoIterator for &'a NoteCollection {
    type Item = &'a Note;
    type IntoIter = std::slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}
