//! Asintel CLI entry point.
//!
//! Binary name: `asintel`
//!
//! Parses CLI arguments, loads configuration, then dispatches to the
//! appropriate command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,asintel=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "asintel", &mut std::io::stdout());
        return Ok(());
    }

    // Load configuration
    let state = AppState::init().await;

    match cli.command {
        Commands::Chat { domain } => {
            cli::chat::run_chat_loop(&state, domain).await?;
        }

        Commands::Extract { path } => {
            cli::extract::run(&path, cli.json).await?;
        }

        Commands::Fetch {
            asins,
            fields,
            domain,
        } => {
            cli::fetch::run(&state, &asins, &fields, domain, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
