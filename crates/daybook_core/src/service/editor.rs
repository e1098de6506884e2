//! Presentation-side editing state.
//!
//! Purely local, non-persisted: one line of input text and the post
//! currently being edited, if any. Submission resets both
//! deterministically.

use crate::model::post::{Post, PostId};
use crate::service::view_model::JournalViewModel;

/// Which intent a submit resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    /// The input was saved as a new post.
    Added,
    /// The post with this id had its content replaced.
    Updated(PostId),
}

/// Local UI state backing a save-or-edit input line.
#[derive(Debug, Default)]
pub struct EditorState {
    input: String,
    editing: Option<Post>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Returns the post currently under edit, if any.
    pub fn editing(&self) -> Option<&Post> {
        self.editing.as_ref()
    }

    /// Begins editing: loads the post's content into the input line.
    pub fn start_edit(&mut self, post: &Post) {
        self.input = post.content.clone();
        self.editing = Some(post.clone());
    }

    /// Save-or-edit: adds a new post, or replaces the edited one.
    ///
    /// Clears the input on both paths and the editing mark on the edit
    /// path, before the mutation is observable through the feed.
    pub fn submit(&mut self, journal: &JournalViewModel) -> SubmitAction {
        let content = std::mem::take(&mut self.input);
        match self.editing.take() {
            Some(post) => {
                journal.update_post(&post, content);
                SubmitAction::Updated(post.id)
            }
            None => {
                journal.add_post(content);
                SubmitAction::Added
            }
        }
    }
}
