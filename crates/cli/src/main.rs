//! Clear Hearing CLI - snapshot and data directory tools.
//!
//! # Usage
//!
//! ```bash
//! # Write every collection (without orders) to a file
//! ch-cli export --out backup.json
//!
//! # Include the order log
//! ch-cli export --out backup.json --include-orders
//!
//! # Replace the collections present in a snapshot file
//! ch-cli import --file backup.json
//!
//! # Write default content for collections that have never been saved
//! ch-cli seed
//! ```
//!
//! Every command reads `STOREFRONT_DATA_DIR` (default: `data`) unless
//! `--data-dir` is given.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ch-cli")]
#[command(author, version, about = "Clear Hearing CLI tools")]
struct Cli {
    /// Directory holding the JSON collections
    #[arg(long, global = true, env = "STOREFRONT_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the store as a single JSON document
    Export {
        /// Output file; prints to stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Include the order log
        #[arg(long)]
        include_orders: bool,
    },
    /// Replace collections from a JSON snapshot
    Import {
        /// Snapshot file to read
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Seed default content for collections that were never saved
    Seed,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

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
        Commands::Export {
            out,
            include_orders,
        } => commands::export::run(&cli.data_dir, out.as_deref(), include_orders).await?,
        Commands::Import { file } => commands::import::run(&cli.data_dir, &file).await?,
        Commands::Seed => commands::seed::run(&cli.data_dir).await?,
    }
    Ok(())
}
