//! Concierge CLI, the main entry point.
//!
//! Commands:
//! - `serve`   start the ACP gateway
//! - `ask`     run one query through an agent
//! - `tool`    invoke a health or note tool directly
//! - `doctor`  check config, LLM key, store and sub-agents
//! - `onboard` write a default config file

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "concierge",
    about = "Concierge: personal assistant orchestrator",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Send one query and print the reply
    Ask {
        /// The query text
        query: String,

        /// Agent to ask
        #[arg(short, long, default_value = concierge_agent::PERSONAL_ASSISTANT)]
        agent: String,
    },

    /// Invoke a health or note tool with JSON arguments
    Tool {
        /// Tool name (e.g. get_food_log, list_notes)
        name: String,

        /// Arguments as a JSON object
        args: Option<String>,
    },

    /// Diagnose configuration and connectivity
    Doctor,

    /// Write a default configuration file
    Onboard,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Ask { query, agent } => commands::ask::run(&agent, &query).await?,
        Commands::Tool { name, args } => commands::tool::run(&name, args.as_deref()).await?,
        Commands::Doctor => commands::doctor::run().await?,
        Commands::Onboard => commands::onboard::run().await?,
    }

    Ok(())
}
