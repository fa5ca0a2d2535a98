use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::feed::Subscription;
use crate::models::*;

/// Errors reported by a persistence backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("note {0} not found")]
    NotFound(Uuid),

    #[error("storage error: {0:#}")]
    Storage(anyhow::Error),
}

impl From<anyhow::Error> for BackendError {
    fn from(e: anyhow::Error) -> Self {
        Self::Storage(e)
    }
}

/// Record store of notes keyed by id, with a change feed.
///
/// Every successful write is pushed to all subscribers, including the
/// subscriber belonging to the writer.
#[async_trait]
pub trait NoteBackend: Send + Sync {
    /// All notes, most recently updated first.
    async fn list_notes(&self) -> Result<Vec<Note>, BackendError>;

    /// Insert a note; the backend assigns id and timestamps.
    async fn insert_note(&self, input: CreateNoteInput) -> Result<Note, BackendError>;

    /// Apply a partial update and return the stored record.
    async fn update_note(&self, id: Uuid, input: UpdateNoteInput) -> Result<Note, BackendError>;

    async fn delete_note(&self, id: Uuid) -> Result<(), BackendError>;

    /// Open a new subscription to the change feed.
    fn subscribe(&self) -> Subscription;
}
