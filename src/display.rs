//! Plain-text rendering of notes, answers and reports for the terminal.
//!
//! Every function returns a `String`; printing is left to the caller.

use time::macros::format_description;

use crate::advisor::{AdvisorReply, AnalysisReply, Answer, ContextScope, PatternAnalysis};
use crate::analytics::{MoodTrends, Statistics};
use crate::models::{Note, timestamp};
use crate::store::ListFilter;

/// Content shown per note in listings.
pub const LIST_PREVIEW_CHARS: usize = 100;
/// Content shown per note in search results.
pub const SEARCH_PREVIEW_CHARS: usize = 150;

const RULE: usize = 50;
const REPORT_RULE: usize = 60;

/// Cuts `text` to `limit` characters, appending `...` when shortened.
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

/// Formats an integer with `,` thousands separators.
pub fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn short_time(value: &time::OffsetDateTime) -> String {
    value
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .unwrap_or_else(|_| timestamp::format(value))
}

// Horizontal rules end with a newline.
fn rule(width: usize) -> String {
    format!("{}\n", "-".repeat(width))
}

fn banner(width: usize) -> String {
    format!("{}\n", "=".repeat(width))
}

pub fn note_saved(note: &Note) -> String {
    format!("Note '{}' saved with ID: {}", note.title, note.id)
}

pub fn journal_saved(note: &Note) -> String {
    let tags = if note.tags.is_empty() {
        "none".to_string()
    } else {
        note.tags.join(", ")
    };
    format!("Journal entry saved with ID: {}. Auto-tags: {tags}", note.id)
}

/// One note as shown by `list`.
pub fn note_details(note: &Note) -> String {
    let mut out = format!("ID: {}\nTitle: {}\nType: {}\n", note.id, note.title, note.kind);
    out.push_str(&format!("Created: {}\n", short_time(&note.created)));
    out.push_str(&format!("Updated: {}\n", short_time(&note.updated)));
    if !note.tags.is_empty() {
        out.push_str(&format!("Tags: {}\n", note.tags.join(", ")));
    }
    if let Some(mood) = note.metadata.mood {
        out.push_str(&format!("Mood: {mood}/10\n"));
    }
    if let Some(energy) = note.metadata.energy_level {
        out.push_str(&format!("Energy: {energy}/10\n"));
    }
    out.push_str(&format!(
        "Content: {}\n",
        truncate(&note.content, LIST_PREVIEW_CHARS)
    ));
    out
}

pub fn note_list(notes: &[&Note], filter: &ListFilter) -> String {
    if notes.is_empty() {
        return "No notes found. Add some with: notes add".to_string();
    }

    let mut out = format!("Found {} notes", notes.len());
    if let Some(tag) = &filter.tag {
        out.push_str(&format!(" with tag '{tag}'"));
    }
    if let Some(kind) = &filter.kind {
        out.push_str(&format!(" of type '{kind}'"));
    }
    out.push_str(":\n");
    out.push_str(&rule(RULE));
    for note in notes {
        out.push_str(&note_details(note));
        out.push_str(&rule(RULE));
    }
    out
}

pub fn search_results(query: &str, notes: &[&Note]) -> String {
    if notes.is_empty() {
        return format!("No matches found for '{query}'");
    }

    let mut out = format!("Found {} matches for '{query}':\n", notes.len());
    out.push_str(&rule(RULE));
    for note in notes {
        out.push_str(&format!("ID: {} - {}\n", note.id, note.title));
        if !note.tags.is_empty() {
            out.push_str(&format!("Tags: {}\n", note.tags.join(", ")));
        }
        out.push_str(&format!(
            "Content: {}\n",
            truncate(&note.content, SEARCH_PREVIEW_CHARS)
        ));
        out.push_str(&rule(RULE));
    }
    out
}

/// Renders an AI answer, structured or raw.
///
/// Ranked answers list each context note with its similarity score.
pub fn answer(answer: &Answer) -> String {
    let mut out = String::new();
    if answer.scope == ContextScope::RelevantOnly {
        if answer.ranked {
            out.push_str(&format!(
                "Found {} most relevant notes\n",
                answer.context_notes.len()
            ));
            for (id, score) in answer.context_notes.iter().zip(&answer.scores) {
                out.push_str(&format!("  {id} (similarity {score:.3})\n"));
            }
        } else {
            out.push_str("Relevance ranking unavailable, using all notes\n");
        }
    }

    match &answer.reply {
        AdvisorReply::Structured(advice) => {
            out.push_str("Structured Response:\n");
            out.push_str(&rule(RULE));
            out.push_str(&format!("Answer: {}\n", advice.answer));
            out.push_str(&format!("Confidence: {:.2}%\n", advice.confidence * 100.0));
            out.push_str(&format!("Sources: {}\n", advice.sources_used.join(", ")));
            if !advice.suggested_actions.is_empty() {
                out.push_str(&format!(
                    "Suggestions: {}\n",
                    advice.suggested_actions.join(", ")
                ));
            }
            if !advice.related_topics.is_empty() {
                out.push_str(&format!("Related: {}\n", advice.related_topics.join(", ")));
            }
        }
        AdvisorReply::Raw(text) => {
            out.push_str("AI Response:\n");
            out.push_str(&rule(RULE));
            out.push_str(&format!("{text}\n"));
        }
    }
    out.push_str(&rule(RULE));
    out
}

pub fn statistics(stats: Option<&Statistics>) -> String {
    let Some(stats) = stats else {
        return "No data available".to_string();
    };

    let mut out = String::from("YOUR STATISTICS\n");
    out.push_str(&banner(40));
    out.push_str(&format!("Total entries: {}\n", stats.total_notes));
    out.push_str(&format!("Total words: {}\n", group_thousands(stats.total_words)));
    out.push_str(&format!("Avg words per entry: {}\n", stats.avg_words));
    out.push_str("\nBy type:\n");
    for (kind, count) in &stats.by_type {
        out.push_str(&format!("  {kind}: {count}\n"));
    }
    if let Some(mood) = stats.average_mood {
        out.push_str(&format!("\nAverage mood: {mood:.1}/10\n"));
    }
    if let Some(energy) = stats.average_energy {
        out.push_str(&format!("Average energy: {energy:.1}/10\n"));
    }
    out.push_str(&banner(40));
    out
}

pub fn mood_trends(trends: Option<&MoodTrends>) -> String {
    let Some(trends) = trends else {
        return "No mood data available yet. Start journaling with mood ratings!".to_string();
    };

    let mut out = String::from("MOOD TRENDS\n");
    out.push_str(&banner(40));
    out.push_str(&format!("Average mood: {:.1}/10\n", trends.average_mood));
    out.push_str(&format!("Entries with mood: {}\n", trends.total_entries));
    out.push_str(&format!(
        "Best: {}/10, lowest: {}/10\n",
        trends.best_mood, trends.lowest_mood
    ));
    if let Some(morning) = trends.morning_average {
        out.push_str(&format!("Morning average: {morning:.1}/10\n"));
    }
    if let Some(evening) = trends.evening_average {
        out.push_str(&format!("Evening average: {evening:.1}/10\n"));
    }
    out.push_str("\nRecent entries:\n");
    for entry in &trends.recent_entries {
        out.push_str(&format!(
            "  {} {}: {}/10\n",
            entry.date, entry.title, entry.mood
        ));
    }
    out.push_str(&banner(40));
    out
}

/// Renders the personal insights report.
pub fn analysis(reply: &AnalysisReply) -> String {
    let mut out = banner(REPORT_RULE);
    out.push_str("YOUR PERSONAL INSIGHTS REPORT\n");
    out.push_str(&banner(REPORT_RULE));

    match reply {
        AnalysisReply::Structured(analysis) => push_analysis(&mut out, analysis),
        AnalysisReply::Raw(text) => out.push_str(&format!("{text}\n")),
    }

    out.push_str(&banner(REPORT_RULE));
    out
}

fn push_analysis(out: &mut String, analysis: &PatternAnalysis) {
    if !analysis.summary.is_empty() {
        out.push_str(&format!("SUMMARY: {}\n\n", analysis.summary));
    }

    let emotional = &analysis.emotional_patterns;
    out.push_str("EMOTIONAL PATTERNS\n");
    push_joined(out, "   Key emotions", &emotional.dominant_emotions);
    if !emotional.trends.is_empty() {
        out.push_str(&format!("   Trends: {}\n", emotional.trends));
    }
    out.push('\n');

    let behavioral = &analysis.behavioral_patterns;
    out.push_str("BEHAVIORAL PATTERNS\n");
    push_joined(out, "   Themes", &behavioral.recurring_themes);
    push_joined(out, "   Growth signs", &behavioral.growth_indicators);
    out.push('\n');

    let recommendations = &analysis.recommendations;
    out.push_str("RECOMMENDATIONS\n");
    push_bullets(out, "   Actions:", &recommendations.immediate_actions);
    push_bullets(out, "   Questions:", &recommendations.reflection_questions);
    out.push('\n');
}

fn push_joined(out: &mut String, label: &str, items: &[String]) {
    if !items.is_empty() {
        out.push_str(&format!("{label}: {}\n", items.join(", ")));
    }
}

fn push_bullets(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(heading);
    out.push('\n');
    for item in items {
        out.push_str(&format!("     - {item}\n"));
    }
}
