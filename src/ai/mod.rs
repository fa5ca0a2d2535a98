//! AI writing assistant.
//!
//! - [`ChatAction`]: what the user asked for, carrying the note content it
//!   applies to.
//! - [`TextGenerator`]: the text-generation collaborator. [`GatewayClient`]
//!   implements it against an OpenAI-compatible chat-completion endpoint.
//! - [`ChatSession`]: an ephemeral transcript with at most one request in
//!   flight.

mod action;
mod gateway;
mod session;

pub use action::*;
pub use gateway::*;
pub use session::*;
