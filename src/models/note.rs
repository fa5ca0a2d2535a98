use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A daily note.
///
/// `updated_at` is never earlier than `created_at`; both are equal right
/// after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Case-insensitive substring match over title and content.
    ///
    /// `needle` is expected to be lowercased already.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }
}

/// Input for creating a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNoteInput {
    pub title: String,
    pub content: String,
}

impl CreateNoteInput {
    /// Trim both fields, rejecting blank ones.
    pub fn normalized(title: &str, content: &str) -> Option<Self> {
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() || content.is_empty() {
            return None;
        }
        Some(Self {
            title: title.to_string(),
            content: content.to_string(),
        })
    }
}

/// Partial update of a note. Fields left as `None` keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNoteInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub completed: Option<bool>,
}

impl UpdateNoteInput {
    /// A title/content edit. Same trimming rules as [`CreateNoteInput`].
    pub fn edit(title: &str, content: &str) -> Option<Self> {
        let input = CreateNoteInput::normalized(title, content)?;
        Some(Self {
            title: Some(input.title),
            content: Some(input.content),
            completed: None,
        })
    }

    /// Only flip the completion flag.
    pub fn completion(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }
}

/// A change to the notes collection, as delivered by the change feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoteChange {
    Insert { note: Note },
    Update { note: Note },
    Delete { id: Uuid },
}

impl NoteChange {
    /// The id of the affected note.
    pub fn id(&self) -> Uuid {
        match self {
            Self::Insert { note } | Self::Update { note } => note.id,
            Self::Delete { id } => *id,
        }
    }
}
