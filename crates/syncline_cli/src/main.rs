//! Syncline CLI
//!
//! Terminal demos driving the client core against the in-process
//! reference server, mirroring the original browser apps.
//!
//! # Commands
//!
//! - `chat` - Post messages and watch the update feed render them
//! - `seats` - Two contending clients hold and book seats
//! - `suggest` - Replay rapid edits through the lookup arbitrator

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Syncline demo command-line tools.
#[derive(Parser)]
#[command(name = "syncline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Post messages and watch the update feed render them
    Chat {
        /// Messages to post; a short sample is used when omitted
        messages: Vec<String>,
    },

    /// Run two contending clients against one seat pool
    Seats {
        /// The seat both clients race for
        #[arg(short, long, default_value = "7")]
        seat: u32,

        /// Number of seats in the pool
        #[arg(long, default_value = "10")]
        count: u32,
    },

    /// Replay rapid edits through the lookup arbitrator
    Suggest {
        /// Successive input states, e.g. "c" "ca" "cat"
        inputs: Vec<String>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Chat { messages } => commands::chat::run(&messages)?,
        Commands::Seats { seat, count } => commands::seats::run(seat, count)?,
        Commands::Suggest { inputs } => commands::suggest::run(&inputs)?,
        Commands::Version => {
            println!("Syncline CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
