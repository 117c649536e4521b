//! Similarity-ranked note retrieval.
//!
//! Embeds the query and every note through the remote provider, scores each
//! note by cosine similarity to the query and keeps the best `top_k`.
//! Vectors are recomputed on every call.

use std::sync::Arc;

use log::{debug, warn};

use crate::gemini::GeminiClientTrait;
use crate::models::Note;

/// Number of notes returned when no explicit limit is given.
pub const DEFAULT_TOP_K: usize = 3;

/// A note with its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredNote<'a> {
    pub note: &'a Note,
    pub score: f32,
}

/// Outcome of a ranking request.
#[derive(Debug, Clone, PartialEq)]
pub enum Relevance<'a> {
    /// Up to `top_k` notes, best first.
    Ranked(Vec<ScoredNote<'a>>),
    /// The query could not be embedded; every note, in storage order.
    Unranked(Vec<&'a Note>),
}

impl<'a> Relevance<'a> {
    /// The selected notes in result order.
    pub fn notes(&self) -> Vec<&'a Note> {
        match self {
            Relevance::Ranked(scored) => scored.iter().map(|s| s.note).collect(),
            Relevance::Unranked(notes) => notes.clone(),
        }
    }

    /// Similarity of each selected note, in result order; `None` when unranked.
    pub fn scores(&self) -> Option<Vec<f32>> {
        match self {
            Relevance::Ranked(scored) => Some(scored.iter().map(|s| s.score).collect()),
            Relevance::Unranked(_) => None,
        }
    }

    pub fn is_ranked(&self) -> bool {
        matches!(self, Relevance::Ranked(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Relevance::Ranked(scored) => scored.len(),
            Relevance::Unranked(notes) => notes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cosine similarity between two vectors.
///
/// Returns 0.0 for vectors of different length or with zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Ranks notes by embedding similarity to a query.
pub struct RelevanceRanker {
    client: Arc<dyn GeminiClientTrait>,
    top_k: usize,
}

impl RelevanceRanker {
    /// Creates a ranker returning at most [`DEFAULT_TOP_K`] notes.
    pub fn new(client: Arc<dyn GeminiClientTrait>) -> Self {
        Self {
            client,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Sets how many notes to return.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Returns the notes most related to `query`.
    ///
    /// If the query cannot be embedded every note is returned unranked. Notes
    /// whose own embedding fails are left out. Equal scores keep their input
    /// order.
    pub fn rank<'a, I>(&self, query: &str, notes: I) -> Relevance<'a>
    where
        I: IntoIterator<Item = &'a Note>,
    {
        let notes: Vec<&'a Note> = notes.into_iter().collect();
        if notes.is_empty() {
            return Relevance::Ranked(Vec::new());
        }

        let query_vec = match self.client.embed(query) {
            Ok(v) => v,
            Err(e) => {
                warn!("query embedding failed, using all notes: {e}");
                return Relevance::Unranked(notes);
            }
        };

        let mut scored: Vec<ScoredNote<'a>> = notes
            .into_iter()
            .filter_map(|note| match self.client.embed(&note.embedding_text()) {
                Ok(vec) => Some(ScoredNote {
                    note,
                    score: cosine_similarity(&query_vec, &vec),
                }),
                Err(e) => {
                    warn!("embedding failed for {}, skipping: {e}", note.id);
                    None
                }
            })
            .collect();

        // Stable sort: ties stay in storage order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(self.top_k);

        debug!("ranked {} relevant notes", scored.len());
        Relevance::Ranked(scored)
    }
}
