mod common;

use common::{note, server_error, FakeNotesApi};
use tagnote_core::{EditorSession, NoteId, Store};

async fn store_with_selection(id: &str) -> Store<FakeNotesApi> {
    let store = Store::new(FakeNotesApi::with_notes(vec![
        note("n1", "Groceries", &["home"]),
        note("n2", "Standup", &["work"]),
    ]));
    store.load_initial().await;
    store.select(Some(NoteId::new(id)));
    store
}

#[tokio::test]
async fn unsaved_edits_stay_out_of_app_state() {
    let store = store_with_selection("n1").await;
    let mut session = EditorSession::new();
    session.sync(&store.state());
    session.begin_edit();
    session.set_title("Groceries for Sunday");
    session.set_content("<p>eggs</p>");

    let state = store.state();
    let selected = state.selected_note().expect("selection should resolve");
    assert_eq!(selected.title, "Groceries");
    assert_eq!(selected.content, "<p>Groceries</p>");
    assert_eq!(session.editor_value(&state), "<p>eggs</p>");
}

#[tokio::test]
async fn save_commits_normalized_buffer_and_exits_edit_mode() {
    let store = store_with_selection("n1").await;
    let mut session = EditorSession::new();
    session.sync(&store.state());
    session.begin_edit();
    session.set_title("");
    session.set_content("<p>eggs</p>");
    session.add_tag("errand");

    let saved = session.save(&store).await.expect("save should succeed");

    assert_eq!(saved.title, "Untitled note");
    assert_eq!(saved.tags, vec!["home", "errand"]);
    assert!(!session.is_editing());
    let state = store.state();
    assert_eq!(state.selected_note(), Some(&saved));
    let buffer = session.buffer().expect("session should hold a buffer");
    assert_eq!(buffer.note, saved);
    assert!(state.tags.contains(&"errand".to_string()));
}

#[tokio::test]
async fn failed_save_exits_edit_mode_and_surfaces_error() {
    let store = store_with_selection("n2").await;
    store.client().fail("update_note", server_error());
    let mut session = EditorSession::new();
    session.sync(&store.state());
    session.begin_edit();
    session.set_title("Retro");

    assert!(session.save(&store).await.is_none());

    assert!(!session.is_editing());
    let state = store.state();
    assert!(state.error.is_some());
    let selected = state.selected_note().expect("selection should resolve");
    assert_eq!(selected.title, "Standup");
    let buffer = session.buffer().expect("session should hold a buffer");
    assert_eq!(buffer.note.title, "Standup");
}

#[tokio::test]
async fn save_outside_edit_mode_sends_nothing() {
    let store = store_with_selection("n1").await;
    let mut session = EditorSession::new();
    session.sync(&store.state());
    session.set_title("ignored");

    assert!(session.save(&store).await.is_none());

    assert!(!store.client().calls().contains(&"update_note".to_string()));
    let state = store.state();
    assert_eq!(state.error, None);
    let buffer = session.buffer().expect("session should hold a buffer");
    assert_eq!(buffer.note.title, "Groceries");
}

#[tokio::test]
async fn delete_requires_confirmation() {
    let store = store_with_selection("n2").await;
    let mut session = EditorSession::new();
    session.sync(&store.state());

    assert!(!session.delete(&store, |_| false).await);
    assert!(!store.client().calls().contains(&"delete_note".to_string()));
    assert!(store.state().selected_note().is_some());

    let mut asked_for = None;
    let deleted = session
        .delete(&store, |note| {
            asked_for = Some(note.id.clone());
            true
        })
        .await;

    assert!(deleted);
    assert_eq!(asked_for, Some(NoteId::new("n2")));
    assert_eq!(store.state().selected_id, None);
    assert!(session.buffer().is_none());
}
