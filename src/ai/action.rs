use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed persona sent as the system message with every request.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant for a daily notes application. You help users with:
- Summarizing their notes
- Rewriting and improving note content
- Answering productivity and planning questions
- Providing helpful suggestions for organization

Be concise, friendly, and practical in your responses. Focus on being helpful without being overly verbose.";

/// The kind of request, as named by clients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Summarize,
    Rewrite,
    Improve,
    #[default]
    Chat,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::Rewrite => "rewrite",
            Self::Improve => "improve",
            Self::Chat => "chat",
        }
    }

}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for ActionKind {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summarize" => Ok(Self::Summarize),
            "rewrite" => Ok(Self::Rewrite),
            "improve" => Ok(Self::Improve),
            "chat" => Ok(Self::Chat),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// A chat request, with the note content the action operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    Summarize(String),
    Rewrite(String),
    Improve(String),
    /// Send the prompt as typed.
    Chat,
}

impl ChatAction {
    /// Pair an action kind with optional note content.
    ///
    /// Note actions without (non-blank) content fall back to [`ChatAction::Chat`].
    pub fn new(kind: ActionKind, note_content: Option<&str>) -> Self {
        let Some(content) = note_content.filter(|c| !c.trim().is_empty()) else {
            return Self::Chat;
        };
        let content = content.to_string();
        match kind {
            ActionKind::Summarize => Self::Summarize(content),
            ActionKind::Rewrite => Self::Rewrite(content),
            ActionKind::Improve => Self::Improve(content),
            ActionKind::Chat => Self::Chat,
        }
    }

    /// Like [`ChatAction::new`] but from a string tag. Unknown tags yield `None`;
    /// a missing tag means chat.
    pub fn from_tag(tag: Option<&str>, note_content: Option<&str>) -> Option<Self> {
        let kind = match tag {
            Some(tag) => tag.parse::<ActionKind>().ok()?,
            None => ActionKind::Chat,
        };
        Some(Self::new(kind, note_content))
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Summarize(_) => ActionKind::Summarize,
            Self::Rewrite(_) => ActionKind::Rewrite,
            Self::Improve(_) => ActionKind::Improve,
            Self::Chat => ActionKind::Chat,
        }
    }

    /// The user message sent to the model for this action.
    pub fn user_message(&self, prompt: &str) -> String {
        match self {
            Self::Summarize(content) => format!(
                "Please summarize the following note concisely, capturing the key points:\n\n{content}"
            ),
            Self::Rewrite(content) => format!(
                "Please improve and rewrite the following note content to make it clearer and more professional:\n\n{content}"
            ),
            Self::Improve(content) => format!(
                "Please suggest improvements for this note and provide a better version:\n\n{content}"
            ),
            Self::Chat => prompt.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_wraps_note_content() {
        let action = ChatAction::new(ActionKind::Summarize, Some("X"));
        let message = action.user_message("Summarize this note titled \"Groceries\"");
        assert!(message.starts_with("Please summarize the following note concisely"));
        assert!(message.ends_with("\n\nX"));
        assert!(!message.contains("Groceries"));
    }

    #[test]
    fn chat_sends_prompt_verbatim() {
        let action = ChatAction::new(ActionKind::Chat, Some("ignored"));
        assert_eq!(action, ChatAction::Chat);
        assert_eq!(action.user_message("How do I plan my week?"), "How do I plan my week?");
    }

    #[test]
    fn note_action_without_content_is_chat() {
        assert_eq!(ChatAction::new(ActionKind::Rewrite, None), ChatAction::Chat);
        assert_eq!(ChatAction::new(ActionKind::Improve, Some("   ")), ChatAction::Chat);
    }

    #[test]
    fn action_kind_parses_and_round_trips() {
        for kind in [
            ActionKind::Summarize,
            ActionKind::Rewrite,
            ActionKind::Improve,
            ActionKind::Chat,
        ] {
            assert_eq!(kind.as_str().parse::<ActionKind>(), Ok(kind));
        }
        assert_eq!(
            "translate".parse::<ActionKind>(),
            Err(UnknownAction("translate".to_string()))
        );
    }

    #[test]
    fn from_tag_maps_known_tags() {
        assert_eq!(
            ChatAction::from_tag(Some("improve"), Some("draft")),
            Some(ChatAction::Improve("draft".to_string()))
        );
        assert_eq!(ChatAction::from_tag(None, Some("draft")), Some(ChatAction::Chat));
        assert_eq!(ChatAction::from_tag(Some("translate"), Some("draft")), None);
    }

    #[test]
    fn rewrite_and_improve_use_distinct_templates() {
        let rewrite = ChatAction::Rewrite("n".to_string()).user_message("p");
        let improve = ChatAction::Improve("n".to_string()).user_message("p");
        assert!(rewrite.contains("clearer and more professional"));
        assert!(improve.contains("provide a better version"));
    }
}
