use std::{collections::HashSet, fs, rc::Rc};

use keepsake::{
    filter, html, AlwaysConfirm, DeleteOutcome, DiaryDraft, DrawingCapture, Entry, EntryId, FileStore,
    Journal, KeyValueStore, Mood, Note, NoteDraft, Project, RecipeDraft, RenderContext, Segment,
    StoredDrawing,
};
use tempfile::TempDir;

fn open(dir: &TempDir) -> Journal {
    let store = FileStore::open(dir.path().join("data")).expect("open store");
    Journal::open(Rc::new(store))
}

#[test]
fn notes_scenario_end_to_end() {
    let dir = TempDir::new().unwrap();
    let mut journal = open(&dir);

    let note1 = journal
        .notes
        .create(NoteDraft::new("Plan", "Buy cake", "Shopping"))
        .unwrap();
    assert_eq!(note1.category_color, "ff7675");
    assert_eq!(journal.notes.entries(), &[note1.clone()]);

    let note2 = journal.notes.create(NoteDraft::new("", "Call mom", "")).unwrap();
    let order: Vec<EntryId> = journal.notes.entries().iter().map(|n| n.id).collect();
    assert_eq!(order, vec![note2.id, note1.id]);

    let found = filter(journal.notes.entries(), "cake");
    assert_eq!(found, vec![&note1]);

    let declined = journal.notes.delete(note1.id, &|_: &str| false).unwrap();
    assert_eq!(declined, DeleteOutcome::Declined);
    assert_eq!(journal.notes.len(), 2);

    let deleted = journal.notes.delete(note1.id, &AlwaysConfirm).unwrap();
    assert_eq!(deleted, DeleteOutcome::Deleted(note1));
    assert_eq!(journal.notes.entries(), &[note2.clone()]);

    // A fresh session sees exactly what the last one left behind.
    let reopened = open(&dir);
    assert_eq!(reopened.notes.entries(), &[note2]);
}

#[test]
fn todo_toggle_survives_reload() {
    let dir = TempDir::new().unwrap();
    let mut journal = open(&dir);
    let todo = journal.todos.create("Buy flowers".to_string()).unwrap();
    assert!(!todo.completed);

    assert_eq!(journal.todos.toggle(todo.id).unwrap(), Some(true));
    assert!(open(&dir).todos.entries()[0].completed);

    assert_eq!(journal.todos.toggle(todo.id).unwrap(), Some(false));
    assert!(!open(&dir).todos.entries()[0].completed);
}

#[test]
fn persisted_layout_uses_one_json_array_per_key() {
    let dir = TempDir::new().unwrap();
    let mut journal = open(&dir);
    journal.notes.create(NoteDraft::new("Plan", "Buy cake", "Shopping")).unwrap();
    journal
        .diary
        .create(DiaryDraft { title: "Monday".into(), content: "Sunny".into(), mood: Some(Mood::Calm) })
        .unwrap();
    journal
        .recipes
        .create(RecipeDraft {
            name: "Pancakes".into(),
            ingredients: "2 eggs\nflour".into(),
            instructions: "Mix\nFry".into(),
        })
        .unwrap();

    let data = dir.path().join("data");
    let notes: serde_json::Value = serde_json::from_str(&fs::read_to_string(data.join("notes.json")).unwrap()).unwrap();
    let note = &notes[0];
    for field in ["id", "title", "content", "category", "categoryColor", "createdAt"] {
        assert!(note.get(field).is_some(), "note is missing {}", field);
    }

    let diary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data.join("diaryEntries.json")).unwrap()).unwrap();
    assert_eq!(diary[0]["mood"], "calm");

    let recipes: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data.join("recipes.json")).unwrap()).unwrap();
    assert_eq!(recipes[0]["ingredients"], serde_json::json!(["2 eggs", "flour"]));
    assert_eq!(recipes[0]["instructions"], serde_json::json!(["Mix", "Fry"]));
}

#[test]
fn malformed_collections_load_as_empty() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("notes.json"), "this is not json").unwrap();
    fs::write(data.join("todos.json"), r#"[{"id": "x"}]"#).unwrap();

    let mut journal = open(&dir);
    assert!(journal.notes.is_empty());
    assert!(journal.todos.is_empty());

    // The next mutation replaces the broken data wholesale.
    journal.todos.create("Start over".to_string()).unwrap();
    assert_eq!(open(&dir).todos.len(), 1);
}

#[test]
fn ids_stay_unique_across_sessions_and_gallery_uploads() {
    let dir = TempDir::new().unwrap();
    let mut journal = open(&dir);
    let payloads: Vec<String> = (0..20).map(|i| format!("data:image/png;base64,QQ{}", i)).collect();
    journal.gallery.add_payloads(payloads).unwrap();

    let mut reopened = open(&dir);
    reopened.gallery.create("data:image/png;base64,Wg==".to_string()).unwrap();

    let ids: HashSet<EntryId> = reopened.gallery.entries().iter().map(|g| g.id).collect();
    assert_eq!(ids.len(), 21);
    assert_eq!(reopened.gallery.entries()[20].data, "data:image/png;base64,Wg==");
}

#[test]
fn drawing_flows_into_notes_and_projection() {
    let dir = TempDir::new().unwrap();
    let mut journal = open(&dir);
    let mut pad = StoredDrawing::new(journal.store());
    let drawing = "data:image/png;base64,iVBORw0KGgo=".to_string();
    pad.set_drawing(drawing.clone()).unwrap();

    let draft = NoteDraft::new("Doodle", "", "Ideas").with_drawing(pad.current_drawing().is_some());
    let note = journal.notes.create(draft).unwrap();
    assert!(note.content.ends_with("[Drawing]"));

    let ctx = RenderContext::new().with_drawing(pad.current_drawing());
    let view = note.project(&ctx);
    assert_eq!(view.body, vec![Segment::LineBreak, Segment::Drawing(drawing.clone())]);

    pad.clear().unwrap();
    let view = note.project(&RenderContext::new().with_drawing(pad.current_drawing()));
    assert_eq!(view.body, vec![Segment::LineBreak, Segment::Text("[Drawing]".into())]);

    journal.save_drawing(drawing).unwrap();
    assert_eq!(open(&dir).drawings.len(), 1);
    assert_eq!(open(&dir).gallery.len(), 1);
}

#[test]
fn export_page_contains_every_collection() {
    let dir = TempDir::new().unwrap();
    let mut journal = open(&dir);
    journal.notes.create(NoteDraft::new("Plan", "Buy <cake>", "Shopping")).unwrap();
    journal.todos.create("Buy flowers".to_string()).unwrap();

    let page = html::render_page("My Journal", &journal.page_sections(&RenderContext::new()));
    assert!(page.contains("Buy &lt;cake&gt;"));
    assert!(page.contains("background:#ff7675"));
    assert!(page.contains("Buy flowers"));
    assert!(page.contains("No recipes yet!"));
}

#[test]
fn store_keys_are_independent() {
    let dir = TempDir::new().unwrap();
    let journal = open(&dir);
    let store = journal.store();
    store.set(Note::KEY, "[]").unwrap();
    assert!(store.get("todos").unwrap().is_none());
}

#[test]
fn older_records_with_text_dates_survive_new_writes() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(
        data.join("gallery.json"),
        r#"[{"id":1700000000000.42,"data":"data:image/png;base64,AA","date":"1/2/2024"}]"#,
    )
    .unwrap();
    fs::write(
        data.join("diaryEntries.json"),
        r#"[{"id":1700000000000,"title":"Old","content":"Rainy","mood":"sad","date":"Tuesday, January 2, 2024"}]"#,
    )
    .unwrap();

    let mut journal = open(&dir);
    assert_eq!(journal.gallery.len(), 1);
    journal.gallery.create("data:image/png;base64,BB".to_string()).unwrap();

    let reopened = open(&dir);
    let payloads: Vec<&str> = reopened.gallery.entries().iter().map(|g| g.data.as_str()).collect();
    assert_eq!(payloads, vec!["data:image/png;base64,AA", "data:image/png;base64,BB"]);

    let view = reopened.diary.entries()[0].project(&RenderContext::new());
    assert_eq!(view.date, "Tuesday, January 2, 2024");
    assert_eq!(view.glyph, "😢");
}
