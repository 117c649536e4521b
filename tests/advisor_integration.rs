//! Question answering through the public API with a scripted client.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use smart_notes::{
    AdvisorReply, ContextScope, GeminiClientTrait, GeminiError, NewNote, NoteService, NoteStore,
    ServiceError,
};

/// Embeds by keyword and answers with a fixed reply.
struct ScriptedClient {
    reply: String,
    embeddings: HashMap<&'static str, Vec<f32>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new(reply: &str) -> Arc<Self> {
        let embeddings = HashMap::from([
            ("sleep", vec![1.0, 0.0, 0.0]),
            ("money", vec![0.0, 1.0, 0.0]),
            ("garden", vec![0.0, 0.0, 1.0]),
        ]);
        Arc::new(Self {
            reply: reply.to_string(),
            embeddings,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl GeminiClientTrait for ScriptedClient {
    fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, GeminiError> {
        let lower = text.to_lowercase();
        self.embeddings
            .iter()
            .find(|(keyword, _)| lower.contains(*keyword))
            .map(|(_, v)| v.clone())
            .ok_or_else(|| GeminiError::MalformedResponse(format!("no embedding for {text}")))
    }
}

fn seeded(client: Arc<ScriptedClient>) -> Result<NoteService> {
    let mut service = NoteService::new(NoteStore::in_memory()).with_client(client);
    service.add_note(NewNote::new("Bedtime", "Need more sleep on weekdays"))?;
    service.add_note(NewNote::new("Budget", "Track money spent on coffee"))?;
    service.add_note(NewNote::new("Tomatoes", "The garden needs water"))?;
    service.add_note(NewNote::new("Random", "Nothing to embed here"))?;
    Ok(service)
}

#[test]
fn test_relevant_only_sends_closest_notes() -> Result<()> {
    let client = ScriptedClient::new(r#"{"answer": "Go to bed earlier", "confidence": 0.8}"#);
    let service = seeded(client.clone())?.with_top_k(1);

    let answer = service.ask("How can I sleep better?", ContextScope::RelevantOnly)?;

    assert!(answer.ranked);
    assert_eq!(answer.context_notes.len(), 1);
    let prompt = client.last_prompt();
    assert!(prompt.contains("Relevant Notes:"));
    assert!(prompt.contains("Title: Bedtime"));
    assert!(!prompt.contains("Title: Budget"));
    assert!(!prompt.contains("Title: Random"));
    match answer.reply {
        AdvisorReply::Structured(advice) => assert_eq!(advice.answer, "Go to bed earlier"),
        AdvisorReply::Raw(raw) => panic!("expected structured reply, got {raw}"),
    }
    Ok(())
}

#[test]
fn test_relevant_only_falls_back_when_question_cannot_be_embedded() -> Result<()> {
    let client = ScriptedClient::new("Plain answer");
    let service = seeded(client.clone())?;

    let answer = service.ask("What is on my mind?", ContextScope::RelevantOnly)?;

    assert!(!answer.ranked);
    assert_eq!(answer.context_notes.len(), 4);
    assert_eq!(answer.reply, AdvisorReply::Raw("Plain answer".to_string()));
    Ok(())
}

#[test]
fn test_all_notes_scope_includes_every_note() -> Result<()> {
    let client = ScriptedClient::new("{}");
    let service = seeded(client.clone())?;

    let answer = service.ask("Summarize", ContextScope::AllNotes)?;

    let prompt = client.last_prompt();
    assert!(prompt.contains("My Notes Collection:"));
    for title in ["Bedtime", "Budget", "Tomatoes", "Random"] {
        assert!(prompt.contains(&format!("Title: {title}")));
    }
    // `{}` has no answer field, so the raw text is kept.
    assert!(!answer.reply.is_structured());
    Ok(())
}

#[test]
fn test_ask_on_empty_store_still_reaches_the_model() -> Result<()> {
    let client = ScriptedClient::new("You have no notes yet.");
    let service = NoteService::new(NoteStore::in_memory()).with_client(client.clone());

    let answer = service.ask("Anything?", ContextScope::AllNotes)?;

    assert!(client.last_prompt().contains("No notes available."));
    assert_eq!(answer.reply.text(), "You have no notes yet.");
    Ok(())
}

#[test]
fn test_analysis_requires_notes() {
    let service = NoteService::new(NoteStore::in_memory()).with_client(ScriptedClient::new("{}"));

    assert!(matches!(service.analyze_patterns(), Err(ServiceError::NoNotes)));
}
