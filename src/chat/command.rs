use inquire::autocompletion::{Autocomplete, Replacement};

use crate::api::FeedbackType;
use crate::session::MessageId;

// Available slash commands: (command, description)
const SLASH_COMMANDS: &[(&str, &str)] = &[
    ("/config", "Show session configuration"),
    ("/dislike", "Rate a reply as not helpful"),
    ("/feedback", "Leave feedback on the conversation"),
    ("/help", "Show available commands"),
    ("/history", "Show the conversation so far"),
    ("/lang", "Switch between English and Arabic"),
    ("/like", "Rate a reply as helpful"),
    ("/quit", "Exit chat mode"),
];

/// Slash command autocompleter
#[derive(Clone, Default)]
pub struct SlashCommandCompleter;

impl Autocomplete for SlashCommandCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        if !input.starts_with('/') {
            return Ok(vec![]);
        }

        let suggestions: Vec<String> = SLASH_COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(input))
            .map(|(cmd, desc)| format!("{cmd}  {desc}"))
            .collect();

        Ok(suggestions)
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        let replacement =
            highlighted_suggestion.map(|s| s.split_whitespace().next().unwrap_or("").to_string());
        Ok(replacement)
    }
}

/// Slash command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Config,
    Feedback,
    Help,
    History,
    Lang,
    /// Inline rating; `None` targets the latest rateable reply.
    Rate {
        feedback_type: FeedbackType,
        message_id: Option<MessageId>,
    },
    Quit,
    Unknown(String),
}

/// Input types
#[derive(Debug)]
pub enum Input {
    Text(String),
    Command(SlashCommand),
    Empty,
}

pub fn parse_input(input: &str) -> Input {
    let input = input.trim();

    if input.is_empty() {
        return Input::Empty;
    }

    input
        .strip_prefix('/')
        .map_or_else(|| Input::Text(input.to_string()), parse_slash_command)
}

fn parse_slash_command(cmd: &str) -> Input {
    let parts: Vec<&str> = cmd.split_whitespace().collect();

    let rate = |feedback_type| SlashCommand::Rate {
        feedback_type,
        message_id: parts.get(1).map(|id| MessageId::new(*id)),
    };

    match parts.first().copied() {
        Some("config") => Input::Command(SlashCommand::Config),
        Some("feedback") => Input::Command(SlashCommand::Feedback),
        Some("help") => Input::Command(SlashCommand::Help),
        Some("history") => Input::Command(SlashCommand::History),
        Some("lang" | "language") => Input::Command(SlashCommand::Lang),
        Some("like") => Input::Command(rate(FeedbackType::Like)),
        Some("dislike") => Input::Command(rate(FeedbackType::Dislike)),
        Some("quit" | "exit" | "q") => Input::Command(SlashCommand::Quit),
        _ => Input::Command(SlashCommand::Unknown(parts.join(" "))),
    }
}
