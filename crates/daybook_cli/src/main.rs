//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable that wires `daybook_core` end to end:
//!   in-memory store, live subscription, one round of mutations.
//! - Keep output deterministic for quick local sanity checks.

use daybook_core::{EditorState, JournalStore, JournalViewModel};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    println!("daybook_core version={}", daybook_core::core_version());

    match smoke() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("smoke probe failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn smoke() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(JournalStore::open_in_memory()?);
    let feed = store.subscribe()?;
    println!("seed snapshot posts={}", feed.recv()?.len());

    let journal = JournalViewModel::new(Arc::clone(&store))?;
    let mut editor = EditorState::new();
    editor.set_input("hello from the smoke probe");
    editor.submit(&journal);

    let after_add = feed.recv()?;
    println!("after add posts={}", after_add.len());
    let newest = after_add.first().ok_or("expected a post after add")?;

    let first = store.get(newest.id)?;
    println!("first post content={}", first.content);

    store.delete(&first)?;
    println!("after delete posts={}", feed.recv()?.len());

    Ok(())
}
