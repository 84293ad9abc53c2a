//! Zephyr Demo CLI
//!
//! Command-line interface for exercising the Zephyr wallet-session, x401
//! and x402 flows with a local software wallet. By default it talks to the
//! configured RPC endpoint; `--offline` swaps in an in-memory ledger so
//! every flow can run without a network.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod ledger;
mod ui;
mod wallet;

#[derive(Parser)]
#[command(name = "zephyr-demo")]
#[command(about = "Zephyr Demo CLI - connect, authenticate (x401) and pay (x402)", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use an in-memory ledger instead of the RPC endpoint
    #[arg(long, global = true)]
    offline: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect the demo wallet and show the session account
    Connect,

    /// Run the x401 flow: sign and verify a proof-of-identity message
    Auth,

    /// Run the x402 flow: pay tokens (or native currency) to a recipient
    Pay {
        /// Human decimal amount to send
        #[arg(short, long, default_value = "0.01")]
        amount: String,

        /// Recipient address (defaults to the configured receiver)
        #[arg(short, long)]
        recipient: Option<String>,

        /// Send native currency instead of the configured token
        #[arg(long)]
        native: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "zephyr_client=debug,zephyr_demo_cli=debug,info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Commands::Connect => commands::connect::run(cli.offline).await,
        Commands::Auth => commands::auth::run(cli.offline).await,
        Commands::Pay {
            amount,
            recipient,
            native,
        } => commands::pay::run(cli.offline, &amount, recipient.as_deref(), native).await,
    }
}
