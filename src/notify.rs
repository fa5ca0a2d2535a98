//! User-facing notifications ("toasts").
//!
//! Notifications are fire-and-forget: there is no acknowledgement and no
//! queue. Subscribers only ever observe the most recent toast, which is the
//! semantics of a [`tokio::sync::watch`] channel.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

/// Non-blocking notification channel shared by the store and chat session.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: Arc<watch::Sender<Option<Toast>>>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Publish a toast. Never blocks and never fails, even with no listeners.
    pub fn notify(&self, toast: Toast) {
        match toast.severity {
            Severity::Error => {
                tracing::warn!(title = %toast.title, "{}", toast.description)
            }
            _ => tracing::info!(title = %toast.title, "{}", toast.description),
        }
        self.tx.send_replace(Some(toast));
    }

    pub fn success(&self, title: impl Into<String>, description: impl Into<String>) {
        self.notify(Toast {
            title: title.into(),
            description: description.into(),
            severity: Severity::Success,
        });
    }

    pub fn error(&self, title: impl Into<String>, description: impl Into<String>) {
        self.notify(Toast {
            title: title.into(),
            description: description.into(),
            severity: Severity::Error,
        });
    }

    /// The most recent toast, if any was published.
    pub fn latest(&self) -> Option<Toast> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Toast>> {
        self.tx.subscribe()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
