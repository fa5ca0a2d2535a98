//! Client-side note store.
//!
//! [`NoteStore`] keeps a local, ordered copy of the notes held by a
//! [`NoteBackend`] and mediates every mutation. Remote changes arrive through
//! the backend's change feed and are reconciled by [`NoteStore::apply_change`].
//!
//! A failed remote write never touches the local cache. Failures are reported
//! through the [`Notifier`] and a log line, and never stop further use of the
//! store.

mod backend;
mod feed;
mod realtime;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub use backend::*;
pub use feed::*;
pub use realtime::*;

use uuid::Uuid;

use crate::insights::Progress;
use crate::models::*;
use crate::notify::Notifier;

#[derive(Clone)]
pub struct NoteStore {
    backend: Arc<dyn NoteBackend>,
    notes: Arc<Mutex<Vec<Note>>>,
    loading: Arc<AtomicBool>,
    notifier: Notifier,
}

impl NoteStore {
    pub fn new(backend: Arc<dyn NoteBackend>, notifier: Notifier) -> Self {
        Self {
            backend,
            notes: Arc::new(Mutex::new(Vec::new())),
            loading: Arc::new(AtomicBool::new(true)),
            notifier,
        }
    }

    /// Snapshot of the cached notes, most recently updated first.
    pub fn notes(&self) -> Vec<Note> {
        self.notes.lock().expect("note cache lock poisoned").clone()
    }

    pub fn get(&self, id: Uuid) -> Option<Note> {
        self.notes
            .lock()
            .expect("note cache lock poisoned")
            .iter()
            .find(|n| n.id == id)
            .cloned()
    }

    /// True until the first [`NoteStore::load`] finishes.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Notes whose title or content contains `query`, ignoring case.
    /// A blank query matches everything; otherwise surrounding whitespace
    /// is part of the match.
    pub fn search(&self, query: &str) -> Vec<Note> {
        if query.trim().is_empty() {
            return self.notes();
        }
        let needle = query.to_lowercase();
        self.notes
            .lock()
            .expect("note cache lock poisoned")
            .iter()
            .filter(|n| n.matches(&needle))
            .cloned()
            .collect()
    }

    pub fn progress(&self) -> Progress {
        Progress::of(&self.notes.lock().expect("note cache lock poisoned"))
    }

    // ============================================================
    // Remote operations
    // ============================================================

    /// Fetch every note from the backend, replacing the cache.
    ///
    /// On failure the cache is emptied and the user is told to refresh.
    /// Safe to call repeatedly.
    pub async fn load(&self) {
        match self.backend.list_notes().await {
            Ok(notes) => {
                tracing::debug!(count = notes.len(), "Loaded notes");
                *self.notes.lock().expect("note cache lock poisoned") = notes;
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching notes");
                self.with_notes(Vec::clear);
                self.notifier
                    .error("Error", "Failed to load notes. Please refresh the page.");
            }
        }
        self.loading.store(false, Ordering::Release);
    }

    /// Create a note. Returns `None` on blank input or backend failure.
    pub async fn create(&self, title: &str, content: &str) -> Option<Note> {
        let Some(input) = CreateNoteInput::normalized(title, content) else {
            tracing::debug!("Ignoring create with empty title or content");
            return None;
        };

        match self.backend.insert_note(input).await {
            Ok(note) => {
                self.with_notes(|notes| upsert(notes, note.clone()));
                self.notifier
                    .success("Note created", "Your note has been saved successfully.");
                Some(note)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error creating note");
                self.notifier
                    .error("Error", "Failed to create note. Please try again.");
                None
            }
        }
    }

    /// Replace a note's title and content.
    pub async fn update(&self, id: Uuid, title: &str, content: &str) -> Option<Note> {
        let Some(input) = UpdateNoteInput::edit(title, content) else {
            tracing::debug!(%id, "Ignoring update with empty title or content");
            return None;
        };

        match self.backend.update_note(id, input).await {
            Ok(note) => {
                self.with_notes(|notes| replace_existing(notes, note.clone()));
                self.notifier
                    .success("Note updated", "Your changes have been saved.");
                Some(note)
            }
            Err(e) => {
                tracing::error!(%id, error = %e, "Error updating note");
                self.notifier
                    .error("Error", "Failed to update note. Please try again.");
                None
            }
        }
    }

    /// Set the completion flag of a note.
    pub async fn toggle_complete(&self, id: Uuid, completed: bool) -> Option<Note> {
        match self
            .backend
            .update_note(id, UpdateNoteInput::completion(completed))
            .await
        {
            Ok(note) => {
                self.with_notes(|notes| replace_existing(notes, note.clone()));
                if completed {
                    self.notifier
                        .success("Task completed", "Great job! Keep it up! 🎉");
                } else {
                    self.notifier
                        .success("Task marked as pending", "Task moved back to pending.");
                }
                Some(note)
            }
            Err(e) => {
                tracing::error!(%id, error = %e, "Error toggling completion");
                self.notifier
                    .error("Error", "Failed to update task status. Please try again.");
                None
            }
        }
    }

    /// Delete a note. Returns whether the backend accepted the delete.
    pub async fn delete(&self, id: Uuid) -> bool {
        match self.backend.delete_note(id).await {
            Ok(()) => {
                self.with_notes(|notes| remove(notes, id));
                self.notifier
                    .success("Note deleted", "Your note has been removed.");
                true
            }
            Err(e) => {
                tracing::error!(%id, error = %e, "Error deleting note");
                self.notifier
                    .error("Error", "Failed to delete note. Please try again.");
                false
            }
        }
    }

    // ============================================================
    // Change reconciliation
    // ============================================================

    /// Reconcile a change notification into the cache.
    ///
    /// Inserts apply only if the id is absent; updates and deletes only if it
    /// is present. Returns whether the cache changed.
    pub fn apply_change(&self, change: NoteChange) -> bool {
        tracing::debug!(id = %change.id(), "Realtime update: {:?}", change);
        self.with_notes(|notes| match change {
            NoteChange::Insert { note } => {
                if notes.iter().any(|n| n.id == note.id) {
                    return false;
                }
                place(notes, note);
                true
            }
            NoteChange::Update { note } => replace_existing(notes, note),
            NoteChange::Delete { id } => remove(notes, id),
        })
    }

    fn with_notes<T>(&self, f: impl FnOnce(&mut Vec<Note>) -> T) -> T {
        let mut notes = self.notes.lock().expect("note cache lock poisoned");
        f(&mut notes)
    }
}

/// Insert keeping `updated_at` descending; ties go first.
fn place(notes: &mut Vec<Note>, note: Note) {
    let at = notes
        .iter()
        .position(|n| n.updated_at <= note.updated_at)
        .unwrap_or(notes.len());
    notes.insert(at, note);
}

fn upsert(notes: &mut Vec<Note>, note: Note) {
    remove(notes, note.id);
    place(notes, note);
}

fn replace_existing(notes: &mut Vec<Note>, note: Note) -> bool {
    if !remove(notes, note.id) {
        return false;
    }
    place(notes, note);
    true
}

fn remove(notes: &mut Vec<Note>, id: Uuid) -> bool {
    let before = notes.len();
    notes.retain(|n| n.id != id);
    notes.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn note_at(minute: i64) -> Note {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap() + Duration::minutes(minute);
        Note {
            id: Uuid::new_v4(),
            title: format!("note {minute}"),
            content: "body".to_string(),
            completed: false,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn place_keeps_updated_at_descending() {
        let mut notes = Vec::new();
        for minute in [5, 1, 9, 3] {
            place(&mut notes, note_at(minute));
        }
        let order: Vec<_> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(order, ["note 9", "note 5", "note 3", "note 1"]);
    }

    #[test]
    fn replace_existing_moves_fresh_record_to_front() {
        let mut notes = Vec::new();
        let old = note_at(1);
        place(&mut notes, old.clone());
        place(&mut notes, note_at(5));

        let mut edited = old.clone();
        edited.updated_at = old.updated_at + Duration::minutes(10);
        assert!(replace_existing(&mut notes, edited.clone()));
        assert_eq!(notes[0], edited);
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn replace_existing_ignores_unknown_id() {
        let mut notes = vec![note_at(1)];
        assert!(!replace_existing(&mut notes, note_at(2)));
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn upsert_never_duplicates() {
        let mut notes = Vec::new();
        let note = note_at(1);
        upsert(&mut notes, note.clone());
        upsert(&mut notes, note);
        assert_eq!(notes.len(), 1);
    }
}
