mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{Connection, Row};
use uuid::Uuid;

use crate::models::*;
use crate::store::{BackendError, ChangeFeed, NoteBackend, Subscription};

const NOTE_COLUMNS: &str = "id, title, content, completed, created_at, updated_at";

/// SQLite-backed note storage.
///
/// Every successful write is published on the database's [`ChangeFeed`], so
/// all subscribers (including the writer's own store) see it.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    feed: ChangeFeed,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self::from_connection(conn))
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            feed: ChangeFeed::new(),
        }
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    // ============================================================
    // Note operations
    // ============================================================

    /// All notes, most recently updated first.
    pub fn get_all_notes(&self) -> Result<Vec<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes ORDER BY updated_at DESC, created_at DESC"
        ))?;

        let notes = stmt
            .query_map([], note_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    pub fn get_note(&self, id: Uuid) -> Result<Option<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        fetch_note(&conn, id)
    }

    pub fn create_note(&self, input: CreateNoteInput) -> Result<Note> {
        let note = {
            let conn = self.conn.lock().expect("database lock poisoned");
            let id = Uuid::new_v4();
            let now = now();

            conn.execute(
                "INSERT INTO notes (id, title, content, completed, created_at, updated_at)
                 VALUES (?, ?, ?, 0, ?, ?)",
                (
                    id.to_string(),
                    &input.title,
                    &input.content,
                    format_timestamp(now),
                    format_timestamp(now),
                ),
            )?;

            Note {
                id,
                title: input.title,
                content: input.content,
                completed: false,
                created_at: now,
                updated_at: now,
            }
        };

        self.feed.publish(NoteChange::Insert { note: note.clone() });
        Ok(note)
    }

    /// Apply a partial update. Returns `None` if the note does not exist.
    ///
    /// The read and the write happen under one connection lock, so fields
    /// the input leaves as `None` keep the value they have at write time.
    pub fn update_note(&self, id: Uuid, input: UpdateNoteInput) -> Result<Option<Note>> {
        let note = {
            let conn = self.conn.lock().expect("database lock poisoned");
            let Some(existing) = fetch_note(&conn, id)? else {
                return Ok(None);
            };

            let note = Note {
                id,
                title: input.title.unwrap_or(existing.title),
                content: input.content.unwrap_or(existing.content),
                completed: input.completed.unwrap_or(existing.completed),
                created_at: existing.created_at,
                updated_at: now().max(existing.updated_at),
            };

            conn.execute(
                "UPDATE notes SET title = ?, content = ?, completed = ?, updated_at = ?
                 WHERE id = ?",
                (
                    &note.title,
                    &note.content,
                    note.completed as i32,
                    format_timestamp(note.updated_at),
                    id.to_string(),
                ),
            )?;
            note
        };

        self.feed.publish(NoteChange::Update { note: note.clone() });
        Ok(Some(note))
    }

    pub fn delete_note(&self, id: Uuid) -> Result<bool> {
        let rows = {
            let conn = self.conn.lock().expect("database lock poisoned");
            conn.execute("DELETE FROM notes WHERE id = ?", [id.to_string()])?
        };

        if rows > 0 {
            self.feed.publish(NoteChange::Delete { id });
        }
        Ok(rows > 0)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
            feed: self.feed.clone(),
        }
    }
}

#[async_trait]
impl NoteBackend for Database {
    async fn list_notes(&self) -> Result<Vec<Note>, BackendError> {
        Ok(self.get_all_notes()?)
    }

    async fn insert_note(&self, input: CreateNoteInput) -> Result<Note, BackendError> {
        Ok(self.create_note(input)?)
    }

    async fn update_note(&self, id: Uuid, input: UpdateNoteInput) -> Result<Note, BackendError> {
        Database::update_note(self, id, input)?.ok_or(BackendError::NotFound(id))
    }

    async fn delete_note(&self, id: Uuid) -> Result<(), BackendError> {
        if Database::delete_note(self, id)? {
            Ok(())
        } else {
            Err(BackendError::NotFound(id))
        }
    }

    fn subscribe(&self) -> Subscription {
        self.feed.subscribe()
    }
}

/// `<data dir>/daynotes.db` for the current platform.
pub fn default_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "daynotes")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join("daynotes.db"))
}

fn fetch_note(conn: &Connection, id: Uuid) -> Result<Option<Note>> {
    let mut stmt = conn.prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?"))?;

    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        Ok(Some(note_from_row(row)?))
    } else {
        Ok(None)
    }
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: parse_uuid(row.get::<_, String>(0)?),
        title: row.get(1)?,
        content: row.get(2)?,
        completed: row.get::<_, i32>(3)? != 0,
        created_at: parse_datetime(row.get::<_, String>(4)?),
        updated_at: parse_datetime(row.get::<_, String>(5)?),
    })
}

/// Current time at the precision timestamps are stored with.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width UTC so that text ordering matches time ordering.
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
