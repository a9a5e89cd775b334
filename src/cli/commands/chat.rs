use anyhow::Result;
use std::sync::Arc;

use crate::api::HttpChatApi;
use crate::chat::ChatRepl;
use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};
use crate::identity::{SessionIdentity, UserIdStore};
use crate::session::ChatSession;

#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub endpoint: Option<String>,
    pub language: Option<String>,
}

pub async fn run_chat(options: ChatOptions) -> Result<()> {
    let (session, config) = start_session(&options)?;
    let mut repl = ChatRepl::new(session, config.endpoint);
    repl.run().await
}

/// Resolves configuration and builds a session against the HTTP chatbot.
pub(crate) fn start_session(options: &ChatOptions) -> Result<(ChatSession, ResolvedConfig)> {
    let manager = ConfigManager::new()?;
    let file_config = manager.load_or_default()?;
    let config = resolve_config(
        &ResolveOptions {
            endpoint: options.endpoint.clone(),
            language: options.language.clone(),
        },
        &file_config,
    )?;

    let identity = load_identity();
    let api = Arc::new(HttpChatApi::new(config.endpoint.clone()));
    let session = ChatSession::new(api, identity, config.session_options());

    Ok((session, config))
}

/// Persisted identity, or a throwaway one if local state is unusable.
fn load_identity() -> SessionIdentity {
    match UserIdStore::new().and_then(|store| SessionIdentity::initialize(&store)) {
        Ok(identity) => identity,
        Err(err) => {
            tracing::warn!(
                error = %format!("{err:#}"),
                "user id store unavailable, using a temporary id"
            );
            SessionIdentity::ephemeral()
        }
    }
}
