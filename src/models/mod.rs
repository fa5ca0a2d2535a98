//! Domain models for daynotes.
//!
//! # Core Concepts
//!
//! - [`Note`]: A user-authored title/content pair with a completion flag.
//!   Identifiers and timestamps are assigned by the persistence layer.
//! - [`NoteChange`]: A change notification pushed to every subscriber of the
//!   note feed, including the client that caused the change.
//! - [`ChatMessage`]: One turn of an AI chat transcript. Transcripts are
//!   ephemeral and never persisted.

mod chat;
mod note;

pub use chat::*;
pub use note::*;
