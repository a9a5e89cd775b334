//! Chat mode UI components.

use crate::api::FeedbackType;
use crate::i18n::{Language, TextDirection};
use crate::session::{Message, MessageId, Sender, SessionOptions};
use crate::ui::Style;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header() {
    println!(
        "{} {} - Support Chat",
        Style::header("parley"),
        Style::version(format!("v{VERSION}"))
    );
    println!();
}

pub fn print_welcome(language: Language) {
    // Right-to-left mark so bidi-aware terminals align Arabic text.
    let mark = match language.direction() {
        TextDirection::Ltr => "",
        TextDirection::Rtl => "\u{200F}",
    };
    println!("🤖 {mark}{}", Style::bot(language.strings().welcome));
    println!();
}

pub fn print_goodbye() {
    println!("{}", Style::success("Goodbye!"));
}

pub struct ConfigView<'a> {
    pub endpoint: &'a str,
    pub session_id: &'a str,
    pub user_id: &'a str,
    pub language: Language,
    pub options: &'a SessionOptions,
}

pub fn print_config(view: &ConfigView<'_>) {
    println!("{}", Style::header("Configuration"));
    println!(
        "  {}   {}",
        Style::label("endpoint"),
        Style::secondary(view.endpoint)
    );
    println!(
        "  {}   {}",
        Style::label("language"),
        Style::value(view.language)
    );
    println!(
        "  {}    {}",
        Style::label("session"),
        Style::value(view.session_id)
    );
    println!(
        "  {}       {}",
        Style::label("user"),
        Style::value(view.user_id)
    );
    println!(
        "  {}  {} {}",
        Style::label("threshold"),
        Style::value(view.options.feedback_threshold),
        Style::secondary(format!(
            "(feedback after {} ms)",
            view.options.feedback_delay.as_millis()
        ))
    );
    println!();
}

pub fn print_help() {
    println!("{}", Style::header("Available commands"));
    for (command, description) in [
        ("/lang", "Switch between English and Arabic"),
        ("/like [id]", "Rate a reply as helpful (latest by default)"),
        ("/dislike [id]", "Rate a reply as not helpful"),
        ("/feedback", "Leave feedback on the conversation"),
        ("/history", "Show the conversation so far"),
        ("/config", "Show session configuration"),
        ("/help", "Show this help"),
        ("/quit", "Exit chat mode"),
    ] {
        println!(
            "  {:<24} {}",
            Style::command(command),
            Style::secondary(description)
        );
    }
    println!();
}

fn feedback_marker(feedback_type: Option<FeedbackType>) -> &'static str {
    match feedback_type {
        Some(FeedbackType::Like) => " 👍",
        Some(FeedbackType::Dislike) => " 👎",
        None => "",
    }
}

/// Prints one transcript entry. `rating` is the inline rating, if any.
pub fn print_message(message: &Message, rating: Option<FeedbackType>) {
    let time = Style::secondary(message.time_label());
    match message.sender {
        Sender::User => println!("👤 {}  {time}", Style::user(&message.text)),
        Sender::Bot if message.metadata.is_error => {
            println!("🤖 {}  {time}", Style::error(&message.text));
        }
        Sender::Bot if message.metadata.is_system => {
            println!("🤖 {}  {time}", Style::success(&message.text));
        }
        Sender::Bot => {
            println!("🤖 {}", Style::bot(&message.text));
            let id = message
                .message_id()
                .map_or_else(String::new, |id| format!("  #{id}"));
            println!(
                "   {time}{}{}",
                Style::secondary(id),
                feedback_marker(rating)
            );
        }
    }
}

pub fn print_history<F>(transcript: &[Message], rating: F)
where
    F: Fn(&MessageId) -> Option<FeedbackType>,
{
    if transcript.is_empty() {
        println!("{}", Style::hint("No messages yet."));
        println!();
        return;
    }

    println!("{}", Style::header("Conversation"));
    for message in transcript {
        print_message(message, message.message_id().and_then(&rating));
    }
    println!();
}

pub fn print_rated(message_id: &MessageId, feedback_type: FeedbackType) {
    println!(
        "{} Rated #{} as {}{}",
        Style::success("✓"),
        message_id,
        Style::value(feedback_type),
        feedback_marker(Some(feedback_type))
    );
    println!();
}

pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
    eprintln!();
}
