//! Interactive chat mode.
//!
//! A REPL front end for [`ChatSession`](crate::session::ChatSession): text
//! is sent to the chatbot, slash commands drive language, rating and
//! feedback.

/// Slash command parsing and autocomplete.
pub mod command;
mod repl;
mod ui;

pub use repl::ChatRepl;
