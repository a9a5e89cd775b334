//! # parley - Support Chat CLI
//!
//! `parley` talks to a bilingual (English/Arabic) support chatbot over HTTP.
//! Replies with low confidence prompt for feedback, and any reply can be
//! rated inline.
//!
//! ## Features
//!
//! - **Interactive mode**: REPL with slash commands (`parley chat`)
//! - **One-shot questions**: `parley ask "Where is my order?"`
//! - **Feedback**: a prompt after low-confidence replies, plus `/like` and
//!   `/dislike` for any reply
//! - **Two languages**: switch between English and Arabic with `/lang`
//!
//! ## Quick Start
//!
//! ```bash
//! # Interactive chat against the default endpoint
//! parley
//!
//! # Arabic, custom endpoint
//! parley --language ar --endpoint https://support.example.com chat
//!
//! # Pipe a question in
//! echo "How do I reset my password?" | parley ask
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/parley/config.toml`:
//!
//! ```toml
//! [parley]
//! endpoint = "http://localhost:8000"
//! language = "en"
//!
//! [feedback]
//! confidence_threshold = 0.7
//! delay_ms = 1000
//! ```
//!
//! The anonymous user id is kept in `~/.local/share/parley/state.toml`.

/// Client for the remote chatbot service.
pub mod api;

/// Interactive chat mode.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management.
pub mod config;

/// File system utilities.
pub mod fs;

/// Supported languages and localized strings.
pub mod i18n;

/// Session and persisted user identity.
pub mod identity;

/// XDG-style path utilities for configuration and local state.
pub mod paths;

/// Conversation lifecycle and feedback workflows.
pub mod session;

/// Terminal UI components (spinner, colors).
pub mod ui;
