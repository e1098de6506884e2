//! Core use-case services.
//!
//! # Responsibility
//! - Bridge the store's push-based feed into presentation-consumable state.
//! - Translate presentation intents into store mutations.

pub mod editor;
pub mod view_model;
