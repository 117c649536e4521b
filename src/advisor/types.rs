//! Types for AI answers and analyses.

use serde::Deserialize;

use crate::models::NoteId;

/// Which notes are placed in the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextScope {
    /// Every note in the store.
    #[default]
    AllNotes,
    /// Only the notes picked by the relevance ranker.
    RelevantOnly,
}

impl std::fmt::Display for ContextScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllNotes => write!(f, "all_notes"),
            Self::RelevantOnly => write!(f, "relevant_only"),
        }
    }
}

/// Structured answer requested from the model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Advice {
    pub answer: String,
    /// Self-reported confidence, clamped to 0.0-1.0.
    #[serde(default, deserialize_with = "confidence")]
    pub confidence: f64,
    /// Note ids the model says it used.
    #[serde(default)]
    pub sources_used: Vec<String>,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
    #[serde(default)]
    pub related_topics: Vec<String>,
}

fn confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let raw = match &value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().map_or(0.0, |v| {
            if s.contains('%') { v / 100.0 } else { v }
        }),
        _ => 0.0,
    };
    Ok(if raw.is_finite() { raw.clamp(0.0, 1.0) } else { 0.0 })
}

/// The model's reply: parsed JSON when possible, otherwise the raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvisorReply {
    Structured(Advice),
    Raw(String),
}

impl AdvisorReply {
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    /// The answer text, whichever form the reply took.
    pub fn text(&self) -> &str {
        match self {
            Self::Structured(advice) => &advice.answer,
            Self::Raw(raw) => raw,
        }
    }
}

/// Result of asking a question about the notes.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub question: String,
    pub scope: ContextScope,
    /// Ids of the notes placed in the prompt, in prompt order.
    pub context_notes: Vec<NoteId>,
    /// True when the context was narrowed by the relevance ranker; false for
    /// the all-notes scope and when ranking fell back to every note.
    pub ranked: bool,
    /// Similarity of each context note to the question, parallel to
    /// `context_notes`. Empty unless `ranked`.
    pub scores: Vec<f32>,
    pub reply: AdvisorReply,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EmotionalPatterns {
    pub dominant_emotions: Vec<String>,
    pub trends: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BehavioralPatterns {
    pub recurring_themes: Vec<String>,
    pub growth_indicators: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Recommendations {
    pub immediate_actions: Vec<String>,
    pub reflection_questions: Vec<String>,
}

/// Personal-development insights derived from all notes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PatternAnalysis {
    pub emotional_patterns: EmotionalPatterns,
    pub behavioral_patterns: BehavioralPatterns,
    pub recommendations: Recommendations,
    pub summary: String,
}

/// Pattern analysis reply: parsed JSON when possible, otherwise raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisReply {
    Structured(PatternAnalysis),
    Raw(String),
}
