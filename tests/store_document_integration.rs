use anyhow::Result;
use smart_notes::{NoteBuilder, NoteId, NoteStore, NoteUpdate, StoreError};

const LEGACY_DOCUMENT: &str = r#"{
  "note_1a2b3c4d": {
    "title": "Old entry",
    "content": "written before types existed",
    "created": "2024-05-01T09:30:00.123456",
    "updated": "2024-05-01T09:30:00.123456",
    "tags": ["legacy"]
  },
  "note_5e6f7a8b": {
    "title": "Journal - 2024-05-02",
    "content": "feeling great today",
    "created": "2024-05-02T21:15:00",
    "updated": "2024-05-02T21:15:00",
    "tags": ["positive"],
    "type": "journal",
    "metadata": {
      "mood": "great",
      "energy_level": 7,
      "word_count": 3,
      "created_date_only": "2024-05-02",
      "created_hour": 21
    }
  }
}"#;

#[test]
fn test_legacy_document_loads_with_defaults() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("notes.json");
    std::fs::write(&path, LEGACY_DOCUMENT)?;

    let store = NoteStore::open(&path);

    assert_eq!(store.len(), 2);
    let old = store.get(&NoteId::new("note_1a2b3c4d")).unwrap();
    assert_eq!(old.kind, "general");
    assert_eq!(old.metadata.mood, None);
    assert_eq!(old.created.hour(), 9);

    let journal = store.get(&NoteId::new("note_5e6f7a8b")).unwrap();
    assert_eq!(journal.kind, "journal");
    assert_eq!(journal.metadata.mood, None);
    assert_eq!(journal.metadata.energy_level, Some(7));
    assert_eq!(journal.created_hour(), 21);
    Ok(())
}

#[test]
fn test_save_then_load_preserves_everything() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("notes.json");

    let mut store = NoteStore::open(&path);
    for (title, mood) in [("c", Some(3)), ("a", None), ("b", Some(9))] {
        store.add(
            NoteBuilder::new(title, format!("content of {title}"))
                .tags(vec![format!("tag-{title}")])
                .maybe_mood(mood),
        )?;
    }
    let first_id = store.notes()[0].id.clone();
    store.update(
        &first_id,
        NoteUpdate {
            content: Some("changed".to_string()),
            ..NoteUpdate::default()
        },
    )?;

    let reloaded = NoteStore::open(&path);

    assert_eq!(reloaded.notes(), store.notes());
    Ok(())
}

#[test]
fn test_non_ascii_text_is_written_verbatim() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("notes.json");

    let mut store = NoteStore::open(&path);
    store.add(NoteBuilder::new("Café", "naïve résumé 😊"))?;

    let raw = std::fs::read_to_string(&path)?;
    assert!(raw.contains("naïve résumé 😊"));
    assert_eq!(NoteStore::open(&path).notes()[0].title, "Café");
    Ok(())
}

#[test]
fn test_delete_unknown_id_leaves_document_unchanged() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("notes.json");
    let mut store = NoteStore::open(&path);
    store.add(NoteBuilder::new("keep", "me"))?;
    let before = std::fs::read_to_string(&path)?;

    let result = store.delete(&NoteId::new("note_00000000"));

    assert!(matches!(result, Err(StoreError::NotFound(_))));
    assert_eq!(store.len(), 1);
    assert_eq!(std::fs::read_to_string(&path)?, before);
    Ok(())
}

#[test]
fn test_corrupt_document_starts_empty_and_is_replaced_on_write() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("notes.json");
    std::fs::write(&path, "{ not json")?;

    let mut store = NoteStore::open(&path);
    assert!(store.is_empty());

    store.add(NoteBuilder::new("fresh", "start"))?;
    assert_eq!(NoteStore::open(&path).len(), 1);
    Ok(())
}
