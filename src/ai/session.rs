use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use thiserror::Error;

use super::{ChatAction, TextGenerator, SYSTEM_PROMPT};
use crate::models::ChatMessage;
use crate::notify::Notifier;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a message is still being sent")]
    Busy,
}

/// One conversation with the assistant.
///
/// At most one [`ChatSession::send`] is in flight; every user message is
/// followed by exactly one assistant message (the reply, or an apology
/// describing the failure) before the next send is accepted.
pub struct ChatSession<G> {
    generator: G,
    notifier: Notifier,
    transcript: Mutex<Vec<ChatMessage>>,
    sending: AtomicBool,
}

impl<G: TextGenerator> ChatSession<G> {
    pub fn new(generator: G, notifier: Notifier) -> Self {
        Self {
            generator,
            notifier,
            transcript: Mutex::new(Vec::new()),
            sending: AtomicBool::new(false),
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.transcript.lock().expect("transcript lock poisoned").clone()
    }

    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::Acquire)
    }

    /// Send `prompt` and append the reply.
    ///
    /// Returns `None` without doing anything if the prompt is blank or a send
    /// is already in flight. Returns `None` after appending an apology if the
    /// generator fails. If the returned future is dropped before the reply
    /// arrives, an apology is appended in its place.
    pub async fn send(&self, prompt: &str, action: ChatAction) -> Option<String> {
        if prompt.trim().is_empty() {
            return None;
        }
        let Some(mut turn) = PendingTurn::begin(&self.sending, &self.transcript, prompt) else {
            tracing::debug!("Ignoring send while a request is in flight");
            return None;
        };

        let message = action.user_message(prompt);
        tracing::info!(
            action = action.kind().as_str(),
            prompt_len = prompt.len(),
            has_note_content = action != ChatAction::Chat,
            "AI chat request"
        );

        match self.generator.generate(SYSTEM_PROMPT, &message).await {
            Ok(reply) => {
                turn.answer(reply.clone());
                Some(reply)
            }
            Err(e) => {
                tracing::error!(error = %e, "AI chat error");
                let reason = e.to_string();
                self.notifier.error("AI Assistant", reason.clone());
                turn.answer(apology(&reason));
                None
            }
        }
    }

    /// Discard the transcript. Refused while a send is in flight.
    pub fn clear(&self) -> Result<(), SessionError> {
        let mut transcript = self.transcript.lock().expect("transcript lock poisoned");
        if self.is_sending() {
            return Err(SessionError::Busy);
        }
        transcript.clear();
        Ok(())
    }
}

/// The assistant turn recorded when a request fails.
pub fn apology(reason: &str) -> String {
    format!(
        "I'm sorry, I encountered an issue: {}. Please try again in a moment.",
        reason.trim_end_matches('.')
    )
}

/// One user turn awaiting its answer; holds the session in `Sending`.
///
/// The flag flips and the user message is pushed under the transcript lock,
/// so `clear` never observes one without the other. Dropping an unanswered
/// turn appends an apology before returning the session to idle.
struct PendingTurn<'a> {
    sending: &'a AtomicBool,
    transcript: &'a Mutex<Vec<ChatMessage>>,
    answered: bool,
}

impl<'a> PendingTurn<'a> {
    fn begin(
        sending: &'a AtomicBool,
        transcript: &'a Mutex<Vec<ChatMessage>>,
        prompt: &str,
    ) -> Option<Self> {
        let mut messages = transcript.lock().expect("transcript lock poisoned");
        sending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        messages.push(ChatMessage::user(prompt));
        Some(Self {
            sending,
            transcript,
            answered: false,
        })
    }

    fn answer(&mut self, content: String) {
        self.transcript
            .lock()
            .expect("transcript lock poisoned")
            .push(ChatMessage::assistant(content));
        self.answered = true;
    }
}

impl Drop for PendingTurn<'_> {
    fn drop(&mut self) {
        let mut messages = match self.transcript.lock() {
            Ok(messages) => messages,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !self.answered {
            tracing::warn!("AI chat request cancelled before a reply arrived");
            messages.push(ChatMessage::assistant(apology("the request was cancelled")));
        }
        self.sending.store(false, Ordering::Release);
    }
}
