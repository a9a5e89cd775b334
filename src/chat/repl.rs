use anyhow::Result;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use inquire::{Select, Text};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use super::command::{Input, SlashCommand, SlashCommandCompleter, parse_input};
use super::ui;
use crate::api::FeedbackType;
use crate::session::{
    ChatSession, FeedbackOutcome, FeedbackState, MessageId, SendOutcome, SessionEvent,
};
use crate::ui::{Spinner, optional_answer};

/// Extra wait beyond the feedback delay before giving up on the prompt.
const FEEDBACK_GRACE: Duration = Duration::from_millis(500);

/// Terminal adapter around a [`ChatSession`].
///
/// Reads user input, calls session operations and renders the results. The
/// session itself knows nothing about the terminal.
pub struct ChatRepl {
    session: ChatSession,
    events: broadcast::Receiver<SessionEvent>,
    endpoint: String,
}

impl ChatRepl {
    pub fn new(session: ChatSession, endpoint: String) -> Self {
        let events = session.subscribe();
        Self {
            session,
            events,
            endpoint,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.session.open();
        ui::print_header();
        ui::print_welcome(self.session.language());

        let prompt_style = Styled::new("❯")
            .with_fg(Color::LightBlue)
            .with_attr(Attributes::BOLD);
        let mut render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);

        // Non-highlighted suggestions: gray
        render_config.option = StyleSheet::new().with_fg(Color::Grey);
        // Highlighted suggestion: purple
        render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));

        loop {
            self.handle_pending_events().await?;

            let language = self.session.language();
            let help = format!(
                "{} (/help for commands, Ctrl+C to quit)",
                language.strings().placeholder
            );
            let input = Text::new(language.badge())
                .with_render_config(render_config)
                .with_autocomplete(SlashCommandCompleter)
                .with_help_message(&help)
                .prompt();

            match input {
                Ok(line) => match parse_input(&line) {
                    Input::Empty => {}
                    Input::Command(cmd) => {
                        if !self.handle_command(cmd) {
                            break;
                        }
                    }
                    Input::Text(text) => {
                        self.send_and_print(&text).await?;
                    }
                },
                Err(
                    inquire::InquireError::OperationCanceled
                    | inquire::InquireError::OperationInterrupted,
                ) => {
                    println!(); // Clear line before goodbye message
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.session.close();
        ui::print_goodbye();
        Ok(())
    }

    fn handle_command(&self, cmd: SlashCommand) -> bool {
        match cmd {
            SlashCommand::Config => {
                let identity = self.session.identity();
                ui::print_config(&ui::ConfigView {
                    endpoint: &self.endpoint,
                    session_id: identity.session_id(),
                    user_id: identity.user_id(),
                    language: self.session.language(),
                    options: self.session.options(),
                });
            }
            SlashCommand::Feedback => self.session.request_feedback(),
            SlashCommand::Help => ui::print_help(),
            SlashCommand::History => {
                ui::print_history(&self.session.transcript(), |id| {
                    self.session.inline_feedback(id)
                });
            }
            SlashCommand::Lang => {
                let language = self.session.toggle_language();
                ui::print_welcome(language);
            }
            SlashCommand::Rate {
                feedback_type,
                message_id,
            } => self.rate(feedback_type, message_id),
            SlashCommand::Quit => return false,
            SlashCommand::Unknown(cmd) => {
                ui::print_error(&format!("Unknown command: /{cmd}"));
            }
        }
        true
    }

    fn rate(&self, feedback_type: FeedbackType, message_id: Option<MessageId>) {
        let Some(message_id) = message_id.or_else(|| self.session.last_rateable_message_id())
        else {
            ui::print_error("There is no reply to rate yet");
            return;
        };

        // The request runs in the background; failures are only logged.
        match self.session.submit_inline_feedback(feedback_type, &message_id) {
            Some(_) => ui::print_rated(&message_id, feedback_type),
            None => ui::print_error(&format!("No reply with id #{message_id}")),
        }
    }

    async fn send_and_print(&mut self, text: &str) -> Result<()> {
        let spinner = Spinner::new(self.session.strings().typing);
        let outcome = self.session.send_message(text).await;
        spinner.stop();

        match outcome {
            SendOutcome::Replied {
                message,
                feedback_scheduled,
            } => {
                ui::print_message(&message, None);
                println!();
                if feedback_scheduled {
                    self.await_feedback_request().await?;
                }
            }
            SendOutcome::Failed(message) => {
                ui::print_message(&message, None);
                println!();
            }
            SendOutcome::Ignored | SendOutcome::Busy => {}
        }

        Ok(())
    }

    /// Waits for the delayed feedback prompt of a low-confidence reply.
    async fn await_feedback_request(&mut self) -> Result<()> {
        let wait = self.session.options().feedback_delay + FEEDBACK_GRACE;
        let requested = tokio::time::timeout(wait, next_feedback_request(&mut self.events))
            .await
            .unwrap_or(false);

        if requested {
            self.feedback_prompt().await?;
        }
        Ok(())
    }

    /// Shows the feedback prompt if one was requested since the last input.
    async fn handle_pending_events(&mut self) -> Result<()> {
        let mut requested = false;
        loop {
            match self.events.try_recv() {
                Ok(SessionEvent::FeedbackRequested) => requested = true,
                Ok(_) | Err(TryRecvError::Lagged(_)) => {}
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }

        if requested && self.session.feedback_state() != FeedbackState::Idle {
            self.feedback_prompt().await?;
        }
        Ok(())
    }

    async fn feedback_prompt(&self) -> Result<()> {
        let strings = self.session.strings();
        let choices = vec![
            strings.feedback_like,
            strings.feedback_dislike,
            strings.feedback_skip,
        ];

        let choice = optional_answer(Select::new(strings.feedback_prompt, choices).prompt())?;
        let feedback_type = match choice {
            Some(choice) if choice == strings.feedback_like => FeedbackType::Like,
            Some(choice) if choice == strings.feedback_dislike => FeedbackType::Dislike,
            _ => {
                self.session.dismiss_feedback();
                return Ok(());
            }
        };
        self.session.select_feedback_type(feedback_type);

        let Some(comment) = optional_answer(Text::new(strings.feedback_comment).prompt())? else {
            self.session.dismiss_feedback();
            return Ok(());
        };

        if self.session.submit_feedback(&comment).await == FeedbackOutcome::Submitted
            && let Some(thanks) = self.session.transcript().last()
        {
            ui::print_message(thanks, None);
        }
        println!();
        Ok(())
    }
}

async fn next_feedback_request(events: &mut broadcast::Receiver<SessionEvent>) -> bool {
    loop {
        match events.recv().await {
            Ok(SessionEvent::FeedbackRequested) => return true,
            Ok(_) | Err(RecvError::Lagged(_)) => {}
            Err(RecvError::Closed) => return false,
        }
    }
}
