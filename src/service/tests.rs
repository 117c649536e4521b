use super::*;
use std::sync::Mutex;

/// Replies with a fixed generation and unit embeddings, recording prompts.
struct FakeClient {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl FakeClient {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

impl GeminiClientTrait for FakeClient {
    fn generate(&self, prompt: &str) -> std::result::Result<String, GeminiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn embed(&self, _text: &str) -> std::result::Result<Vec<f32>, GeminiError> {
        Ok(vec![1.0, 0.0])
    }
}

fn service() -> NoteService {
    NoteService::new(NoteStore::in_memory())
}

#[test]
fn add_note_stores_trimmed_fields() {
    let mut service = service();

    let note = service
        .add_note(NewNote {
            tags: vec![" health ".to_string(), "".to_string()],
            kind: Some("journal".to_string()),
            mood: Some(7),
            ..NewNote::new("  Morning  ", "hello world")
        })
        .expect("add should succeed");

    assert_eq!(note.title, "Morning");
    assert_eq!(note.tags, vec!["health"]);
    assert_eq!(note.kind, "journal");
    assert_eq!(note.metadata.mood, Some(7));
    assert_eq!(note.metadata.word_count, 2);
    assert_eq!(service.store().len(), 1);
}

#[test]
fn add_note_defaults_blank_kind_to_general() {
    let mut service = service();

    let note = service
        .add_note(NewNote {
            kind: Some("   ".to_string()),
            ..NewNote::new("A", "b")
        })
        .unwrap();

    assert_eq!(note.kind, "general");
}

#[test]
fn add_note_rejects_blank_title_or_content() {
    let mut service = service();

    let err = service.add_note(NewNote::new("   ", "content")).unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ref m) if m == "Title cannot be empty"));
    assert!(err.is_user_error());

    let err = service.add_note(NewNote::new("Title", "\n\t")).unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ref m) if m == "Content cannot be empty"));

    assert!(service.store().is_empty());
}

#[test]
fn quick_journal_uses_default_title_and_auto_tags() {
    let mut service = service();

    let note = service
        .quick_journal(None, "Great meeting with a friend".to_string(), Some(8), None)
        .unwrap();

    assert!(note.title.starts_with("Journal - "));
    assert_eq!(note.title.len(), "Journal - 2024-01-01".len());
    assert_eq!(note.kind, JOURNAL_NOTE_TYPE);
    assert_eq!(note.tags, vec!["positive", "work", "relationships"]);
    assert_eq!(note.metadata.mood, Some(8));
}

#[test]
fn quick_journal_keeps_given_title() {
    let mut service = service();

    let note = service
        .quick_journal(Some("Evening".to_string()), "quiet day".to_string(), None, None)
        .unwrap();

    assert_eq!(note.title, "Evening");
    assert!(note.tags.is_empty());
}

#[test]
fn quick_journal_rejects_empty_content() {
    let mut service = service();
    let err = service
        .quick_journal(None, "  ".to_string(), None, None)
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn search_requires_a_query() {
    let mut service = service();
    service.add_note(NewNote::new("A", "hello world")).unwrap();

    assert!(matches!(service.search("  "), Err(ServiceError::Validation(_))));
    assert_eq!(service.search("HELLO").unwrap().len(), 1);
    assert!(service.search("xyz").unwrap().is_empty());
}

#[test]
fn list_applies_filter() {
    let mut service = service();
    service
        .add_note(NewNote {
            kind: Some("journal".to_string()),
            ..NewNote::new("a", "x")
        })
        .unwrap();
    service.add_note(NewNote::new("b", "y")).unwrap();

    assert_eq!(service.list(&ListFilter::default()).len(), 2);
    assert_eq!(service.list(&ListFilter::kind("JOURNAL")).len(), 1);
}

#[test]
fn update_note_requires_a_change() {
    let mut service = service();
    let id = service.add_note(NewNote::new("A", "b")).unwrap().id.clone();

    let err = service.update_note(&id, NoteUpdate::default()).unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let err = service
        .update_note(
            &id,
            NoteUpdate {
                title: Some(" ".to_string()),
                ..NoteUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(service.get(&id).unwrap().title, "A");
}

#[test]
fn update_note_changes_fields() {
    let mut service = service();
    let id = service.add_note(NewNote::new("A", "b")).unwrap().id.clone();

    let note = service
        .update_note(
            &id,
            NoteUpdate {
                tags: Some(vec!["x".to_string()]),
                kind: Some("idea".to_string()),
                ..NoteUpdate::default()
            },
        )
        .unwrap();

    assert_eq!(note.tags, vec!["x"]);
    assert_eq!(note.kind, "idea");
    assert_eq!(note.title, "A");
}

#[test]
fn update_and_delete_unknown_id_are_not_found() {
    let mut service = service();
    let missing = NoteId::new("note_missing");

    let err = service
        .update_note(
            &missing,
            NoteUpdate {
                title: Some("t".to_string()),
                ..NoteUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Store(StoreError::NotFound(_))));
    assert!(err.is_user_error());

    let err = service.delete_note(&missing).unwrap_err();
    assert!(matches!(err, ServiceError::Store(StoreError::NotFound(_))));
}

#[test]
fn delete_note_returns_removed_note() {
    let mut service = service();
    let id = service.add_note(NewNote::new("A", "b")).unwrap().id.clone();

    let removed = service.delete_note(&id).unwrap();

    assert_eq!(removed.id, id);
    assert!(service.get(&id).is_none());
}

#[test]
fn ai_operations_need_a_client() {
    let mut service = service();
    service.add_note(NewNote::new("A", "b")).unwrap();

    assert!(!service.ai_enabled());
    assert!(matches!(
        service.ask("why?", ContextScope::AllNotes),
        Err(ServiceError::AiDisabled)
    ));
    assert!(matches!(
        service.analyze_patterns(),
        Err(ServiceError::AiDisabled)
    ));
    // Store operations are unaffected.
    assert_eq!(service.search("a").unwrap().len(), 1);
}

#[test]
fn ask_rejects_blank_question() {
    let service = service().with_client(FakeClient::new("{}"));
    assert!(matches!(
        service.ask("  ", ContextScope::AllNotes),
        Err(ServiceError::Validation(_))
    ));
}

#[test]
fn ask_returns_structured_answer() {
    let fake = FakeClient::new(r#"{"answer": "Sleep more", "confidence": 0.9}"#);
    let mut service = service().with_client(fake.clone());
    service.add_note(NewNote::new("Tired", "slept badly")).unwrap();

    let answer = service.ask("How do I feel?", ContextScope::AllNotes).unwrap();

    assert!(answer.reply.is_structured());
    assert_eq!(answer.reply.text(), "Sleep more");
    assert_eq!(answer.context_notes.len(), 1);
    let prompts = fake.prompts.lock().unwrap();
    assert!(prompts[0].contains("Title: Tired"));
    assert!(prompts[0].contains("Question: How do I feel?"));
}

#[test]
fn relevant_only_ask_honours_top_k() {
    let mut service = service()
        .with_client(FakeClient::new("plain text"))
        .with_top_k(2);
    for title in ["a", "b", "c", "d"] {
        service.add_note(NewNote::new(title, "body")).unwrap();
    }

    let answer = service.ask("q", ContextScope::RelevantOnly).unwrap();

    assert!(answer.ranked);
    assert_eq!(answer.context_notes.len(), 2);
    assert!(!answer.reply.is_structured());
    assert_eq!(answer.reply.text(), "plain text");
}

#[test]
fn analyze_patterns_needs_notes() {
    let service = service().with_client(FakeClient::new("{}"));
    let err = service.analyze_patterns().unwrap_err();
    assert!(matches!(err, ServiceError::NoNotes));
    assert!(err.is_user_error());
}

#[test]
fn analyze_patterns_parses_report() {
    let mut service = service().with_client(FakeClient::new(r#"{"summary": "Steady growth"}"#));
    service.add_note(NewNote::new("A", "b")).unwrap();

    match service.analyze_patterns().unwrap() {
        AnalysisReply::Structured(analysis) => assert_eq!(analysis.summary, "Steady growth"),
        AnalysisReply::Raw(raw) => panic!("expected structured analysis, got {raw}"),
    }
}

#[test]
fn statistics_and_mood_trends_delegate_to_analytics() {
    let mut service = service();
    assert!(service.statistics().is_none());
    assert!(service.mood_trends().is_none());

    service
        .add_note(NewNote {
            mood: Some(6),
            ..NewNote::new("A", "one two")
        })
        .unwrap();

    assert_eq!(service.statistics().unwrap().total_words, 2);
    assert_eq!(service.mood_trends().unwrap().average_mood, 6.0);
}

#[test]
fn from_config_without_key_disables_ai() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        notes_file: dir.path().join("notes.json"),
        ..Config::default()
    };

    let service = NoteService::from_config(&config);

    assert!(!service.ai_enabled());
    assert_eq!(service.store().path(), Some(config.notes_file.as_path()));
}

#[test]
fn from_config_with_key_enables_ai() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        notes_file: dir.path().join("notes.json"),
        api_key: Some("test-key".to_string()),
        ..Config::default()
    };

    let service = NoteService::from_config(&config);

    assert!(service.ai_enabled());
}

#[test]
fn invalid_base_url_disables_ai_but_keeps_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        notes_file: dir.path().join("notes.json"),
        api_key: Some("test-key".to_string()),
        api_base_url: "not a url".to_string(),
        ..Config::default()
    };

    let mut service = NoteService::from_config(&config);

    assert!(!service.ai_enabled());
    let id = service.add_note(NewNote::new("A", "still works")).unwrap().id.clone();
    assert_eq!(service.search("works").unwrap().len(), 1);
    assert_eq!(service.list(&ListFilter::default()).len(), 1);
    assert!(service.statistics().is_some());
    service.delete_note(&id).unwrap();

    let err = service.ask("why?", ContextScope::AllNotes).unwrap_err();
    assert!(matches!(err, ServiceError::AiUnavailable(ref reason) if reason.contains("not a url")));
    assert!(!err.is_user_error());
    assert!(matches!(
        service.analyze_patterns(),
        Err(ServiceError::AiUnavailable(_))
    ));
}
