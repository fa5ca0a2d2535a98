//! Small productivity summaries derived from the note list.

mod calendar;
mod progress;
pub mod quotes;

pub use calendar::*;
pub use progress::*;
