use daybook_core::{EditorState, JournalStore, JournalViewModel, SubmitAction};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn open_journal() -> (Arc<JournalStore>, JournalViewModel) {
    let store = Arc::new(JournalStore::open_in_memory().unwrap());
    let journal = JournalViewModel::new(Arc::clone(&store)).unwrap();
    (store, journal)
}

// Fire-and-forget mutations land through the feed; poll until the mirror
// catches up instead of guessing at timing.
fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn mirror_starts_empty() {
    let (_store, journal) = open_journal();

    assert!(journal.state().posts.is_empty());
}

#[test]
fn added_post_appears_in_state() {
    let (_store, journal) = open_journal();

    journal.add_post("first thought");

    assert!(wait_until(|| journal.posts().len() == 1));
    assert_eq!(journal.state().posts[0].content, "first thought");
}

#[test]
fn update_and_delete_flow_through_the_mirror() {
    let (store, journal) = open_journal();
    let post = store.insert("draft").unwrap();

    journal.update_post(&post, "final");
    assert!(wait_until(|| {
        journal
            .posts()
            .first()
            .is_some_and(|current| current.content == "final")
    }));

    journal.delete_post(&post);
    assert!(wait_until(|| journal.posts().is_empty()));
}

#[test]
fn mirror_keeps_only_the_newest_snapshot() {
    let (_store, journal) = open_journal();

    journal.add_post("a");
    journal.add_post("b");
    journal.add_post("c");

    assert!(wait_until(|| journal.posts().len() == 3));
    let posts = journal.posts();
    assert_eq!(posts[0].content, "c");
    assert_eq!(posts[2].content, "a");
}

#[test]
fn editor_add_submit_clears_input_and_saves() {
    let (_store, journal) = open_journal();
    let mut editor = EditorState::new();

    editor.set_input("what I am thinking");
    let action = editor.submit(&journal);

    assert_eq!(action, SubmitAction::Added);
    assert_eq!(editor.input(), "");
    assert!(editor.editing().is_none());
    assert!(wait_until(|| journal.posts().len() == 1));
    assert_eq!(journal.posts()[0].content, "what I am thinking");
}

#[test]
fn editor_start_edit_loads_the_post_content() {
    let (store, _journal) = open_journal();
    let post = store.insert("original words").unwrap();

    let mut editor = EditorState::new();
    editor.start_edit(&post);

    assert_eq!(editor.input(), "original words");
    assert_eq!(editor.editing().map(|editing| editing.id), Some(post.id));
}

#[test]
fn editor_edit_submit_clears_editing_and_replaces_content() {
    let (store, journal) = open_journal();
    let post = store.insert("original words").unwrap();

    let mut editor = EditorState::new();
    editor.start_edit(&post);
    editor.set_input("revised words");
    let action = editor.submit(&journal);

    assert_eq!(action, SubmitAction::Updated(post.id));
    assert_eq!(editor.input(), "");
    assert!(editor.editing().is_none());
    assert!(wait_until(|| {
        journal
            .posts()
            .first()
            .is_some_and(|current| current.content == "revised words")
    }));
}
