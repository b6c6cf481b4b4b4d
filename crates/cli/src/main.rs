//! Pepil CLI, the main entry point.
//!
//! Commands:
//! - `gateway`  Start the HTTP server for the chat widget and dashboard
//! - `compile`  Print or write the compiled knowledge base
//! - `prompt`   Print the full system prompt
//! - `chat`     Ask a single question
//! - `doctor`   Diagnose config and datasets
//! - `status`   Show the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "pepil",
    about = "Pepil, the procedure-ordering assistant for Arrange Clinic",
    version,
    author
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
    /// Start the HTTP gateway server
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Compile the datasets into the knowledge base document
    Compile {
        /// Dataset directory (defaults to knowledge.data_dir)
        #[arg(short, long, env = "PEPIL_DATA_DIR")]
        data_dir: Option<PathBuf>,

        /// Write the document to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the system prompt sent to the model
    Prompt {
        /// Dataset directory (defaults to knowledge.data_dir)
        #[arg(short, long, env = "PEPIL_DATA_DIR")]
        data_dir: Option<PathBuf>,
    },

    /// Ask a single question and print the reply
    Chat {
        /// The question
        #[arg(short, long)]
        message: String,

        /// Dataset directory (defaults to knowledge.data_dir)
        #[arg(short, long, env = "PEPIL_DATA_DIR")]
        data_dir: Option<PathBuf>,
    },

    /// Diagnose configuration and datasets
    Doctor,

    /// Show the effective configuration
    Status,
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
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Gateway { port } => commands::gateway::run(port).await?,
        Commands::Compile { data_dir, output } => commands::compile::run(data_dir, output)?,
        Commands::Prompt { data_dir } => commands::prompt::run(data_dir)?,
        Commands::Chat { message, data_dir } => commands::chat::run(message, data_dir).await?,
        Commands::Doctor => commands::doctor::run().await?,
        Commands::Status => commands::status::run()?,
    }

    Ok(())
}
