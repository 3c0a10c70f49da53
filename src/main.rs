use anyhow::Result;
use chat_core::config::{self, API_KEY_VAR};
use chat_core::{ConversationClient, HistoryStore, OpenAIClient, Settings};
use colored::*;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Command, USAGE};

#[tokio::main]
async fn main() -> ExitCode {
    // The credential is checked before anything else, including argument parsing.
    if let Err(e) = config::require_api_key(|name| std::env::var(name).ok()) {
        eprintln!("{}: {}", "Error".red(), e);
        eprintln!("Please set it using: export {}=\"your-api-key-here\"", API_KEY_VAR);
        return ExitCode::FAILURE;
    }

    let cli = Cli::from_args(std::env::args().skip(1).collect());
    init_logging();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let Some(command) = cli.command() else {
        eprintln!("{}: Please provide a message to send.", "Error".red());
        eprintln!("{}", USAGE);
        return Ok(ExitCode::FAILURE);
    };

    let settings = Settings::from_env()?;
    tracing::debug!(
        state_file = %settings.state_file.display(),
        model = %settings.params.model,
        "resolved settings"
    );

    let mut service = OpenAIClient::new(&settings.api_key).with_base_url(&settings.base_url);
    if let Some(timeout) = settings.timeout {
        service = service.with_timeout(timeout)?;
    }

    let store = HistoryStore::new(settings.state_file.clone());
    let mut client = ConversationClient::with_params(service, store, settings.params.clone());

    match command {
        Command::NewConversation => {
            client.new_conversation();
            println!("Started a new conversation.");
        }
        Command::Send(message) => {
            println!("Thinking...");
            let reply = client.send_message(&message).await?;
            println!("\n{}", reply);

            let exchanges = client.exchange_count();
            if exchanges > 1 {
                println!("\n(Conversation has {} exchanges)", exchanges);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
