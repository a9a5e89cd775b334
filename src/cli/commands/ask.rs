//! One-shot question: send a single message and print the reply.

use anyhow::{Context, Result, bail};
use std::io::{self, Read};

use super::chat::{ChatOptions, start_session};
use crate::session::SendOutcome;
use crate::ui::{Spinner, Style};

const MAX_MESSAGE_SIZE: usize = 64 * 1024;

pub struct AskOptions {
    pub message: Option<String>,
    pub chat: ChatOptions,
}

/// Returns the process exit code: `UNAVAILABLE` when the chatbot could not
/// answer.
pub async fn run_ask(options: AskOptions) -> Result<exitcode::ExitCode> {
    let message = match options.message {
        Some(message) => message,
        None => read_limited(io::stdin().lock())?,
    };

    if message.trim().is_empty() {
        bail!("Error: Message is empty");
    }

    let (session, _) = start_session(&options.chat)?;

    let spinner = Spinner::new(session.strings().typing);
    let outcome = session.open_and_send(&message).await;
    spinner.stop();

    match outcome {
        SendOutcome::Replied { message, .. } => {
            println!("{}", message.text);
            Ok(exitcode::OK)
        }
        SendOutcome::Failed(message) => {
            eprintln!("{}", Style::error(&message.text));
            Ok(exitcode::UNAVAILABLE)
        }
        SendOutcome::Ignored | SendOutcome::Busy => Ok(exitcode::OK),
    }
}

fn read_limited<R: Read>(reader: R) -> Result<String> {
    let mut buffer = Vec::new();
    reader
        .take(MAX_MESSAGE_SIZE as u64 + 1)
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    if buffer.len() > MAX_MESSAGE_SIZE {
        bail!(
            "Error: Message exceeds maximum allowed size ({} KB)",
            MAX_MESSAGE_SIZE / 1024
        );
    }

    String::from_utf8(buffer).context("Input is not valid UTF-8")
}
