//! Local statistics and mood trends computed from note metadata.
//!
//! Nothing here talks to the network; everything is derived from the notes
//! passed in.

use std::collections::BTreeMap;

use crate::models::Note;

/// Entries shown in the "recent" section of the mood report.
pub const RECENT_MOOD_ENTRIES: usize = 5;

/// Notes created before this hour count as morning entries.
const MORNING_END_HOUR: u8 = 12;
/// Notes created at or after this hour count as evening entries.
const EVENING_START_HOUR: u8 = 18;

/// Totals and averages over a note collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub total_notes: usize,
    pub total_words: usize,
    /// Whole words per note (integer division).
    pub avg_words: usize,
    /// Note count per type, sorted by type name.
    pub by_type: BTreeMap<String, usize>,
    pub average_mood: Option<f64>,
    pub average_energy: Option<f64>,
}

/// One mood rating with when it was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodEntry {
    pub date: String,
    pub hour: u8,
    pub mood: u8,
    pub title: String,
}

/// Mood averages overall and by time of day.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodTrends {
    /// Rounded to one decimal place.
    pub average_mood: f64,
    pub total_entries: usize,
    pub best_mood: u8,
    pub lowest_mood: u8,
    pub morning_average: Option<f64>,
    pub evening_average: Option<f64>,
    /// The last few rated entries in storage order.
    pub recent_entries: Vec<MoodEntry>,
}

/// Computes [`Statistics`], or `None` for an empty collection.
pub fn statistics(notes: &[Note]) -> Option<Statistics> {
    if notes.is_empty() {
        return None;
    }

    let total_notes = notes.len();
    let total_words: usize = notes.iter().map(|n| n.metadata.word_count).sum();

    let mut by_type = BTreeMap::new();
    for note in notes {
        *by_type.entry(note.kind.clone()).or_insert(0) += 1;
    }

    Some(Statistics {
        total_notes,
        total_words,
        avg_words: total_words / total_notes,
        by_type,
        average_mood: mean(notes.iter().filter_map(|n| rating(n.metadata.mood))),
        average_energy: mean(notes.iter().filter_map(|n| rating(n.metadata.energy_level))),
    })
}

/// Computes [`MoodTrends`] over notes that carry a mood rating.
///
/// Returns `None` when no note has one.
pub fn mood_trends(notes: &[Note]) -> Option<MoodTrends> {
    let entries: Vec<MoodEntry> = notes
        .iter()
        .filter_map(|note| {
            rating(note.metadata.mood).map(|mood| MoodEntry {
                date: note.created_date(),
                hour: note.created_hour(),
                mood,
                title: note.title.clone(),
            })
        })
        .collect();

    let average = mean(entries.iter().map(|e| e.mood))?;
    let best_mood = entries.iter().map(|e| e.mood).max()?;
    let lowest_mood = entries.iter().map(|e| e.mood).min()?;

    let morning = mean(
        entries
            .iter()
            .filter(|e| e.hour < MORNING_END_HOUR)
            .map(|e| e.mood),
    );
    let evening = mean(
        entries
            .iter()
            .filter(|e| e.hour >= EVENING_START_HOUR)
            .map(|e| e.mood),
    );

    let skip = entries.len().saturating_sub(RECENT_MOOD_ENTRIES);
    let total_entries = entries.len();
    Some(MoodTrends {
        average_mood: round1(average),
        total_entries,
        best_mood,
        lowest_mood,
        morning_average: morning.map(round1),
        evening_average: evening.map(round1),
        recent_entries: entries.into_iter().skip(skip).collect(),
    })
}

// A zero rating is treated as unrated.
fn rating(value: Option<u8>) -> Option<u8> {
    value.filter(|v| *v > 0)
}

fn mean(values: impl Iterator<Item = u8>) -> Option<f64> {
    let (sum, count) = values.fold((0u64, 0u64), |(s, c), v| (s + u64::from(v), c + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
