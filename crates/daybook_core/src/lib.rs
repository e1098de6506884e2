//! Core domain logic for Daybook.
//! This crate is the single source of truth for journal invariants.

pub mod db;
pub mod feed;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use feed::{FeedClosed, FeedSubscription};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::post::{Post, PostId};
pub use repo::post_repo::{PostRepository, RepoError, RepoResult, SqlitePostRepository};
pub use service::editor::{EditorState, SubmitAction};
pub use service::view_model::{JournalUiState, JournalViewModel};
pub use store::journal_store::{JournalStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
