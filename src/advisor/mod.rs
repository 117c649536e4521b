//! AI answers and insights grounded in note content.
//!
//! `NoteAdvisor` builds prompts from all notes or from the relevance ranker's
//! top notes, submits them to the generation endpoint and parses the
//! structured JSON reply, falling back to the raw text.

mod note_advisor;
mod types;

pub use note_advisor::NoteAdvisor;
pub use types::{
    AdvisorReply, Advice, AnalysisReply, Answer, BehavioralPatterns, ContextScope,
    EmotionalPatterns, PatternAnalysis, Recommendations,
};
