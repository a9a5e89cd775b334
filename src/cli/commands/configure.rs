//! Configure command handler for editing default settings.

use anyhow::{Result, bail};
use inquire::{Select, Text};

use crate::config::{
    ConfigFile, ConfigManager, DEFAULT_ENDPOINT, FeedbackConfig, ParleyConfig, ResolveOptions,
    resolve_config,
};
use crate::i18n::SUPPORTED_LANGUAGES;
use crate::identity::UserIdStore;
use crate::session::{DEFAULT_FEEDBACK_DELAY, DEFAULT_FEEDBACK_THRESHOLD};
use crate::ui::{Style, handle_prompt_cancellation};

/// Runs the configure command.
///
/// With `show`, prints the current settings; otherwise prompts for the
/// endpoint, language and feedback settings and saves them.
pub fn run_configure(show: bool) -> Result<()> {
    if show {
        return show_configuration();
    }
    handle_prompt_cancellation(run_configure_inner)
}

fn show_configuration() -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default()?;
    print_current_defaults(&config);

    let store = UserIdStore::new()?;
    println!(
        "  {}   {}",
        Style::label("config"),
        Style::secondary(manager.config_path().display())
    );
    println!(
        "  {}  {} {}",
        Style::label("user id"),
        store
            .load()?
            .map_or_else(|| Style::secondary("(not created yet)"), Style::value),
        Style::secondary(format!("({})", store.path().display()))
    );
    Ok(())
}

fn run_configure_inner() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default()?;

    print_current_defaults(&config);

    let endpoint = prompt_endpoint(config.parley.endpoint.as_deref())?;
    let language = select_language(config.parley.language.as_deref())?;
    let threshold = prompt_threshold(config.feedback.confidence_threshold)?;
    let delay_ms = prompt_delay(config.feedback.delay_ms)?;

    config.parley = ParleyConfig {
        endpoint: Some(endpoint),
        language: Some(language),
    };
    config.feedback = FeedbackConfig {
        confidence_threshold: Some(threshold),
        delay_ms: Some(delay_ms),
    };

    // Reject anything the chat command would refuse to start with.
    resolve_config(&ResolveOptions::default(), &config)?;
    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display().to_string())
    );

    Ok(())
}

fn or_not_set<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(
        || Style::secondary("(not set)"),
        |v| Style::value(v.to_string()),
    )
}

fn print_current_defaults(config: &ConfigFile) {
    println!("{}", Style::header("Current defaults"));
    println!(
        "  {}  {}",
        Style::label("endpoint"),
        or_not_set(config.parley.endpoint.as_deref())
    );
    println!(
        "  {}  {}",
        Style::label("language"),
        or_not_set(config.parley.language.as_deref())
    );
    println!(
        "  {} {}",
        Style::label("threshold"),
        or_not_set(config.feedback.confidence_threshold)
    );
    println!(
        "  {}  {}",
        Style::label("delay ms"),
        or_not_set(config.feedback.delay_ms)
    );
    println!();
}

fn prompt_endpoint(default: Option<&str>) -> Result<String> {
    let endpoint = Text::new("Chatbot endpoint:")
        .with_default(default.unwrap_or(DEFAULT_ENDPOINT))
        .with_help_message("Base URL serving /chat and /feedback")
        .prompt()?;

    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        bail!("Endpoint cannot be empty");
    }
    Ok(endpoint.to_string())
}

fn select_language(default: Option<&str>) -> Result<String> {
    let options: Vec<String> = SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, name)| format!("{code} - {name}"))
        .collect();

    let default_index = default
        .and_then(|d| SUPPORTED_LANGUAGES.iter().position(|(code, _)| *code == d))
        .unwrap_or(0);

    let selection = Select::new("Default language:", options)
        .with_starting_cursor(default_index)
        .prompt()?;

    let code = selection.split(" - ").next().unwrap_or(&selection);
    Ok(code.to_string())
}

fn prompt_threshold(default: Option<f64>) -> Result<f64> {
    let default = default.unwrap_or(DEFAULT_FEEDBACK_THRESHOLD).to_string();
    let answer = Text::new("Ask for feedback below confidence:")
        .with_default(&default)
        .with_help_message("A number between 0.0 and 1.0")
        .prompt()?;

    parse_threshold(&answer)
}

fn prompt_delay(default: Option<u64>) -> Result<u64> {
    let default = default
        .unwrap_or(DEFAULT_FEEDBACK_DELAY.as_millis() as u64)
        .to_string();
    let answer = Text::new("Feedback prompt delay (ms):")
        .with_default(&default)
        .prompt()?;

    match answer.trim().parse() {
        Ok(delay) => Ok(delay),
        Err(_) => bail!("Invalid delay: '{}'", answer.trim()),
    }
}

fn parse_threshold(input: &str) -> Result<f64> {
    match input.trim().parse::<f64>() {
        Ok(value) if (0.0..=1.0).contains(&value) => Ok(value),
        _ => bail!("Invalid threshold: '{}' (expected 0.0 to 1.0)", input.trim()),
    }
}
