//! Journal view model.
//!
//! # Responsibility
//! - Own one live feed subscription and mirror its newest snapshot into a
//!   pull-readable current state.
//! - Forward add/update/delete intents to the store fire-and-forget.
//!
//! # Invariants
//! - The mirrored list starts empty and only ever holds complete snapshots
//!   taken from the feed.
//! - Intent methods never block on the mutation and never surface its
//!   outcome; consistency comes from the feed, not from return values.

use crate::feed::FeedSubscription;
use crate::model::post::Post;
use crate::store::journal_store::{JournalStore, StoreResult};
use log::warn;
use std::sync::{Arc, Mutex, MutexGuard};

/// Immutable state envelope handed to presentation callers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JournalUiState {
    /// Full post list, newest first.
    pub posts: Vec<Post>,
}

/// Mediator between the live store feed and presentation callers.
pub struct JournalViewModel {
    store: Arc<JournalStore>,
    mirror: Mutex<FeedMirror>,
}

struct FeedMirror {
    subscription: FeedSubscription,
    current: Vec<Post>,
}

impl JournalViewModel {
    /// Subscribes to the store's feed and starts with an empty mirror.
    pub fn new(store: Arc<JournalStore>) -> StoreResult<Self> {
        let subscription = store.subscribe()?;
        Ok(Self {
            store,
            mirror: Mutex::new(FeedMirror {
                subscription,
                current: Vec::new(),
            }),
        })
    }

    /// Saves new content as a post.
    ///
    /// Fire-and-forget: the insert is queued and the caller returns at
    /// once; the new post appears through the mirrored list.
    pub fn add_post(&self, content: impl Into<String>) {
        if let Err(err) = self.store.submit_insert(content) {
            warn!("event=post_add module=viewmodel status=error error={err}");
        }
    }

    /// Replaces a post's content, keeping its identity.
    pub fn update_post(&self, post: &Post, new_content: impl Into<String>) {
        if let Err(err) = self.store.submit_update(post.with_content(new_content)) {
            warn!(
                "event=post_edit module=viewmodel status=error id={} error={err}",
                post.id
            );
        }
    }

    /// Permanently removes a post.
    pub fn delete_post(&self, post: &Post) {
        if let Err(err) = self.store.submit_delete(post.clone()) {
            warn!(
                "event=post_remove module=viewmodel status=error id={} error={err}",
                post.id
            );
        }
    }

    /// Returns the newest mirrored snapshot, newest post first.
    pub fn posts(&self) -> Vec<Post> {
        let mut mirror = self.lock_mirror();
        if let Ok(Some(snapshot)) = mirror.subscription.latest() {
            mirror.current = snapshot;
        }
        mirror.current.clone()
    }

    /// Returns the current UI state envelope.
    pub fn state(&self) -> JournalUiState {
        JournalUiState {
            posts: self.posts(),
        }
    }

    fn lock_mirror(&self) -> MutexGuard<'_, FeedMirror> {
        // A poisoning panic cannot corrupt the mirror: the critical section
        // only swaps in complete snapshots.
        match self.mirror.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
