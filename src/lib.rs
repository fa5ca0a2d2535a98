//! Daily notes with realtime sync and an AI writing assistant.
//!
//! The two client-side components are [`store::NoteStore`], a local mirror of
//! the persisted notes kept in sync through a change feed, and
//! [`ai::ChatSession`], a short-lived conversation with a chat-completion
//! gateway. [`api`] serves the same notes and the AI proxy over HTTP.

pub mod ai;
pub mod api;
pub mod config;
pub mod db;
pub mod insights;
pub mod models;
pub mod notify;
pub mod store;
