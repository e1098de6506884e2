//! Post domain model.
//!
//! # Responsibility
//! - Define the single journal record persisted by the store.
//!
//! # Invariants
//! - `id` is assigned by storage on insert, monotonically increasing, and
//!   never reused after deletion.
//! - `content` carries no uniqueness or length constraint; empty is legal.

use serde::{Deserialize, Serialize};

/// Storage-assigned identifier for a journal post.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type PostId = i64;

/// A single journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Row id assigned on insert, immutable thereafter.
    pub id: PostId,
    /// Free-form user text.
    pub content: String,
}

impl Post {
    /// Creates a post from already-persisted parts.
    pub fn new(id: PostId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }

    /// Returns a copy with replaced content and unchanged identity.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            id: self.id,
            content: content.into(),
        }
    }
}
