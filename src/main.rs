use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use parley_cli::cli::commands::{ask, chat, configure};
use parley_cli::cli::{Args, Command};
use parley_cli::i18n::{Language, print_languages};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Some(ref lang) = args.language {
        lang.parse::<Language>()?;
    }

    let chat_options = chat::ChatOptions {
        endpoint: args.endpoint,
        language: args.language,
    };

    match args.command {
        Some(Command::Languages) => print_languages(),
        Some(Command::Configure { show }) => configure::run_configure(show)?,
        Some(Command::Ask { message }) => {
            let code = ask::run_ask(ask::AskOptions {
                message,
                chat: chat_options,
            })
            .await?;
            if code != exitcode::OK {
                std::process::exit(code);
            }
        }
        Some(Command::Chat) | None => chat::run_chat(chat_options).await?,
    }

    Ok(())
}

/// Logs go to stderr so replies on stdout stay pipeable.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    // Only fails if a subscriber is already installed.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
