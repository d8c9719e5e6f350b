//! tally - CLI client for the tally list item service
//!
//! Talks to a running tally-api over HTTP.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tally_core::Config;

mod commands;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "CLI client for the tally list item service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API server URL (overrides config)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an item
    Add {
        /// Item index (unique across the list)
        index: u32,

        /// Item content
        #[arg(short, long)]
        content: Option<String>,

        /// Mark the item
        #[arg(short, long)]
        marked: bool,
    },

    /// List items
    List {
        /// Exact index
        #[arg(short, long)]
        index: Option<u32>,

        /// Range start (inclusive)
        #[arg(long)]
        from: Option<u32>,

        /// Range end (inclusive)
        #[arg(long)]
        to: Option<u32>,
    },

    /// Replace an existing item wholesale
    Set {
        /// Index of the item to replace
        index: u32,

        /// New content
        #[arg(short, long)]
        content: Option<String>,

        /// Mark the item
        #[arg(short, long)]
        marked: bool,
    },

    /// Remove items by index, range, or exact content
    Rm {
        /// Exact index
        #[arg(short, long)]
        index: Option<u32>,

        /// Range start (inclusive)
        #[arg(long)]
        from: Option<u32>,

        /// Range end (inclusive)
        #[arg(long)]
        to: Option<u32>,

        /// Remove every item with exactly this content
        #[arg(short, long)]
        content: Option<String>,
    },

    /// Remove all items
    Clear,

    /// Replace the collection with generated items
    Seed {
        /// Number of items (server default if omitted)
        count: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let server = match cli.server {
        Some(url) => url,
        None => Config::load_default()?.server.url(),
    };
    let client = commands::Client::new(server);

    match cli.command {
        Commands::Add {
            index,
            content,
            marked,
        } => commands::add(&client, index, content, marked, cli.json).await,
        Commands::List { index, from, to } => {
            commands::list(&client, index, from, to, cli.json).await
        }
        Commands::Set {
            index,
            content,
            marked,
        } => commands::set(&client, index, content, marked, cli.json).await,
        Commands::Rm {
            index,
            from,
            to,
            content,
        } => commands::rm(&client, index, from, to, content, cli.json).await,
        Commands::Clear => commands::clear(&client, cli.json).await,
        Commands::Seed { count } => commands::seed(&client, count, cli.json).await,
    }
}
