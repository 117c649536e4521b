//! Question answering and pattern analysis over notes.

use std::sync::Arc;

use log::{debug, warn};

use crate::display::truncate;
use crate::gemini::{GeminiClientTrait, GeminiError};
use crate::models::{Note, NoteId};
use crate::ranker::{DEFAULT_TOP_K, RelevanceRanker};

use super::types::{AdvisorReply, Advice, AnalysisReply, Answer, ContextScope, PatternAnalysis};

/// Prompt asking for a JSON answer to `question` from `notes_context`.
fn ask_prompt(notes_context: &str, question: &str) -> String {
    format!(
        r#"Based on these notes, analyze the question and respond with JSON in this exact format:
{{
  "answer": "your detailed answer here",
  "confidence": 0.85,
  "sources_used": ["note_1", "note_2"],
  "suggested_actions": ["action1", "action2"],
  "related_topics": ["topic1", "topic2"]
}}

Notes: {notes_context}
Question: {question}

Respond ONLY with valid JSON, no other text."#
    )
}

/// Prompt for the personal insights report.
fn analysis_prompt(context: &str) -> String {
    format!(
        r#"You are a personal development coach. Analyze these personal notes and provide insights in JSON format:

{{
  "emotional_patterns": {{
    "dominant_emotions": ["emotion1", "emotion2"],
    "trends": "description of emotional trends"
  }},
  "behavioral_patterns": {{
    "recurring_themes": ["theme1", "theme2"],
    "growth_indicators": ["indicator1", "indicator2"]
  }},
  "recommendations": {{
    "immediate_actions": ["action1", "action2"],
    "reflection_questions": ["question1", "question2"]
  }},
  "summary": "2-3 sentence summary of personal development journey"
}}

Notes data:
{context}

Provide actionable insights for personal growth."#
    )
}

/// Content longer than this is cut in the analysis context.
const ANALYSIS_CONTENT_LIMIT: usize = 500;

/// Answers questions about notes and analyzes personal patterns using an LLM.
pub struct NoteAdvisor {
    client: Arc<dyn GeminiClientTrait>,
    top_k: usize,
}

impl NoteAdvisor {
    #[must_use]
    pub fn new(client: Arc<dyn GeminiClientTrait>) -> Self {
        Self {
            client,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Sets how many notes the relevance ranker keeps.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Answers `question` using `notes` as context.
    ///
    /// With [`ContextScope::RelevantOnly`] the notes are first narrowed by the
    /// relevance ranker. A reply that is not the requested JSON is returned
    /// as [`AdvisorReply::Raw`]; transport and HTTP failures are errors.
    pub fn ask(
        &self,
        question: &str,
        notes: &[Note],
        scope: ContextScope,
    ) -> Result<Answer, GeminiError> {
        let (context, context_notes, scores): (String, Vec<NoteId>, Option<Vec<f32>>) =
            match scope {
                ContextScope::AllNotes => (
                    format_all_notes(notes),
                    notes.iter().map(|n| n.id.clone()).collect(),
                    None,
                ),
                ContextScope::RelevantOnly => {
                    let relevance = RelevanceRanker::new(self.client.clone())
                        .with_top_k(self.top_k)
                        .rank(question, notes);
                    let selected = relevance.notes();
                    (
                        format_relevant_notes(&selected),
                        selected.iter().map(|n| n.id.clone()).collect(),
                        relevance.scores(),
                    )
                }
            };

        let prompt = ask_prompt(&context, question);

        debug!("asking about {} notes ({scope})", context_notes.len());
        let response = self.client.generate(&prompt)?;

        Ok(Answer {
            question: question.to_string(),
            scope,
            context_notes,
            ranked: scores.is_some(),
            scores: scores.unwrap_or_default(),
            reply: parse_advice(&response),
        })
    }

    /// Produces a personal insights report over all `notes`.
    pub fn analyze_patterns(&self, notes: &[Note]) -> Result<AnalysisReply, GeminiError> {
        let prompt = analysis_prompt(&format_analysis_context(notes));
        let response = self.client.generate(&prompt)?;

        let parsed = extract_json(&response)
            .and_then(|json| serde_json::from_str::<PatternAnalysis>(&json).ok());
        Ok(match parsed {
            Some(analysis) => AnalysisReply::Structured(analysis),
            None => {
                warn!("analysis reply was not JSON, showing raw text");
                AnalysisReply::Raw(response)
            }
        })
    }
}

/// Parses the model reply into [`Advice`], falling back to the raw text.
pub(crate) fn parse_advice(response: &str) -> AdvisorReply {
    match extract_json(response).and_then(|json| serde_json::from_str::<Advice>(&json).ok()) {
        Some(advice) => AdvisorReply::Structured(advice),
        None => {
            warn!("answer was not the requested JSON, showing raw text");
            AdvisorReply::Raw(response.to_string())
        }
    }
}

/// Context listing every note, with creation timestamps.
pub(crate) fn format_all_notes(notes: &[Note]) -> String {
    if notes.is_empty() {
        return "No notes available.".to_string();
    }

    let mut context = String::from("My Notes Collection:\n\n");
    for note in notes {
        push_note(&mut context, note);
        context.push_str(&format!(
            "Created: {}\n\n",
            crate::models::timestamp::format(&note.created)
        ));
    }
    context
}

/// Context listing only the ranked notes.
pub(crate) fn format_relevant_notes(notes: &[&Note]) -> String {
    if notes.is_empty() {
        return "No relevant notes found.".to_string();
    }

    let mut context = String::from("Relevant Notes:\n\n");
    for note in notes {
        push_note(&mut context, note);
        context.push('\n');
    }
    context
}

fn push_note(context: &mut String, note: &Note) {
    context.push_str(&format!("ID: {}\n", note.id));
    context.push_str(&format!("Title: {}\n", note.title));
    if !note.tags.is_empty() {
        context.push_str(&format!("Tags: {}\n", note.tags.join(", ")));
    }
    context.push_str(&format!("Content: {}\n", note.content));
}

/// Chronological context for the insights report.
pub(crate) fn format_analysis_context(notes: &[Note]) -> String {
    let mut sorted: Vec<&Note> = notes.iter().collect();
    sorted.sort_by_key(|n| n.created);

    let mut context = format!(
        "Personal Notes Analysis (Total: {} entries)\n\n",
        notes.len()
    );
    for note in sorted {
        context.push_str(&format!("Date: {}\n", note.created_date()));
        context.push_str(&format!("Type: {}\n", note.kind));
        context.push_str(&format!("Title: {}\n", note.title));
        if let Some(mood) = note.metadata.mood {
            context.push_str(&format!("Mood: {mood}/10\n"));
        }
        if let Some(energy) = note.metadata.energy_level {
            context.push_str(&format!("Energy: {energy}/10\n"));
        }
        if !note.tags.is_empty() {
            context.push_str(&format!("Tags: {}\n", note.tags.join(", ")));
        }
        context.push_str(&format!(
            "Content: {}\n",
            truncate(&note.content, ANALYSIS_CONTENT_LIMIT)
        ));
        context.push_str(&"-".repeat(30));
        context.push('\n');
    }
    context
}

/// Extracts the outermost JSON object from a model response.
///
/// Tolerates markdown code fences and prose around the object.
pub(crate) fn extract_json(response: &str) -> Option<String> {
    let trimmed = response.trim();
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;

    if start <= end {
        Some(trimmed[start..=end].to_string())
    } else {
        None
    }
}
