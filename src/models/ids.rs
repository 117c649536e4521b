use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// Prefix carried by every generated note id.
const NOTE_ID_PREFIX: &str = "note_";

/// Number of hex characters taken from the random UUID.
const NOTE_ID_HEX_LEN: usize = 8;

/// Unique identifier for a note.
///
/// Ids are opaque strings. Generated ids look like `note_1a2b3c4d`, but any
/// non-empty string read from an existing document is accepted as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Wraps an existing id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random id of the form `note_xxxxxxxx`.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(format!("{NOTE_ID_PREFIX}{}", &hex[..NOTE_ID_HEX_LEN]))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NoteId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("note id cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for NoteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
