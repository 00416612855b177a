//! Savanna Threads CLI - catalog seeding and session management tools.
//!
//! # Usage
//!
//! ```bash
//! # Seed the remote store with the built-in sample catalog
//! savanna-cli seed products
//!
//! # Seed from a JSON file instead
//! savanna-cli seed products --file catalog.json
//!
//! # Show (and create if missing) the local session token
//! savanna-cli session show
//!
//! # Forget the local session token
//! savanna-cli session reset
//! ```
//!
//! # Commands
//!
//! - `seed products` - Insert catalog rows into the remote store
//! - `session show` - Print the persisted session token
//! - `session reset` - Delete the persisted session token

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "savanna-cli")]
#[command(author, version, about = "Savanna Threads CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the remote store
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage the locally persisted session token
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert catalog products
    Products {
        /// JSON file with an array of product rows; the built-in sample
        /// catalog is used when omitted
        #[arg(short, long)]
        file: Option<String>,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Print the persisted session token, creating one if missing
    Show,
    /// Delete the persisted session token
    Reset,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => {
                commands::seed::products(file.as_deref()).await?;
            }
        },
        Commands::Session { action } => match action {
            SessionAction::Show => commands::session::show()?,
            SessionAction::Reset => commands::session::reset()?,
        },
    }
    Ok(())
}
