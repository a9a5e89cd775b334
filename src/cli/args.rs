use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(about = "Terminal chat client for a bilingual support chatbot")]
#[command(version)]
pub struct Args {
    /// Chatbot service URL
    #[arg(short = 'e', long, global = true)]
    pub endpoint: Option<String>,

    /// Conversation language (en, ar)
    #[arg(short = 'l', long, global = true)]
    pub language: Option<String>,

    /// Log requests and failures in detail
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive chat session (default)
    Chat,
    /// Ask a single question and print the reply
    Ask {
        /// Message to send (reads from stdin if not provided)
        message: Option<String>,
    },
    /// Configure parley settings
    Configure {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// List supported language codes
    Languages,
}
