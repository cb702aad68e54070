//! qbitsync CLI
//!
//! Command-line tools for working with captured qBittorrent maindata.
//!
//! # Commands
//!
//! - `replay` - Apply captured messages in order and print the mirror
//! - `inspect` - Summarize a single captured message

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// qbitsync command-line tools.
#[derive(Parser)]
#[command(name = "qbitsync")]
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
    /// Apply captured maindata messages in order and print the resulting mirror
    Replay {
        /// Message files, or directories of `.json` files applied in name order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Include every torrent in the output
        #[arg(short, long)]
        torrents: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Summarize a single captured maindata message
    Inspect {
        /// Message file
        input: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
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
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Replay {
            inputs,
            torrents,
            format,
        } => {
            commands::replay::run(&inputs, torrents, &format)?;
        }
        Commands::Inspect { input, format } => {
            commands::inspect::run(&input, &format)?;
        }
        Commands::Version => {
            println!("qbitsync CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
