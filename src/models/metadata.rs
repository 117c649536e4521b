use serde::{Deserialize, Deserializer, Serialize};

/// Self-exploration metadata attached to every note.
///
/// `mood` and `energy_level` are user-supplied ratings (nominally 1-10). The
/// store never validates their range. Values that are not numbers in the
/// stored document are read as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteMetadata {
    /// How the author felt when writing the note.
    #[serde(default, deserialize_with = "lenient_rating")]
    pub mood: Option<u8>,
    /// The author's energy level when writing the note.
    #[serde(default, deserialize_with = "lenient_rating")]
    pub energy_level: Option<u8>,
    /// Word count of the content at creation time. Not refreshed on update.
    #[serde(default)]
    pub word_count: usize,
    /// Creation date (`YYYY-MM-DD`), kept for document compatibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date_only: Option<String>,
    /// Hour of day (0-23) the note was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_hour: Option<u8>,
}

/// Counts whitespace-separated words.
pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// Reads a rating, mapping anything non-numeric to `None`.
///
/// Fractional values are rounded and clamped into `u8`.
fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_f64()
        .filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, f64::from(u8::MAX)) as u8))
}
