//! Live journal store.
//!
//! # Responsibility
//! - Own the SQLite connection behind a serialized command worker.
//! - Expose the repository operations asynchronously plus the live feed.

pub mod journal_store;
